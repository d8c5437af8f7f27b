//! Declaration-time validation.
//!
//! These checks catch declarations the program itself built wrong before
//! they reach the engine: policy documents that would not parse, and
//! malformed handlers or event names. Values that are still deferred are
//! checked with a placeholder in place of each reference. Configured inputs
//! such as bucket and table names are passed through; the provider rejects
//! them.

use serde_json::Value;
use stackwire_core::{Output, PropertyRef, StackError};

/// Stand-in for deferred values when validating a document's shape.
const PLACEHOLDER: &str = "placeholder";

/// A property that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{property}: {reason}")]
pub struct ValidationError {
    /// Offending property.
    pub property: &'static str,
    /// Human-readable reason.
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(property: &'static str, reason: impl Into<String>) -> Self {
        Self {
            property,
            reason: reason.into(),
        }
    }

    /// Attach the name of the resource being declared.
    #[must_use]
    pub fn for_resource(self, resource: &str) -> StackError {
        StackError::invalid_property(resource, self.property, self.reason)
    }
}

/// Validate that `policy` renders to a well-formed IAM policy document.
///
/// The document must be a JSON object with a string `Version` and a
/// non-empty `Statement` (object or array), and every statement must carry
/// an `Effect` of `Allow` or `Deny`.
pub fn validate_policy(property: &'static str, policy: &Output<String>) -> Result<(), ValidationError> {
    let placeholder = |_: &PropertyRef| -> Option<Value> { Some(Value::from(PLACEHOLDER)) };
    let rendered = policy
        .as_property()
        .resolve(&placeholder)
        .map_err(|e| ValidationError::new(property, e.to_string()))?;
    let Value::String(text) = rendered else {
        return Err(ValidationError::new(property, "policy must be a JSON string"));
    };

    let doc: Value = serde_json::from_str(&text)
        .map_err(|e| ValidationError::new(property, format!("malformed policy JSON: {e}")))?;

    if !doc.get("Version").is_some_and(Value::is_string) {
        return Err(ValidationError::new(property, "policy is missing `Version`"));
    }

    let statements = match doc.get("Statement") {
        Some(Value::Array(items)) if !items.is_empty() => items.iter().collect::<Vec<_>>(),
        Some(stmt @ Value::Object(_)) => vec![stmt],
        _ => return Err(ValidationError::new(property, "policy has no `Statement`")),
    };

    for stmt in statements {
        match stmt.get("Effect").and_then(Value::as_str) {
            Some("Allow" | "Deny") => {}
            _ => {
                return Err(ValidationError::new(
                    property,
                    "every statement needs an `Effect` of `Allow` or `Deny`",
                ));
            }
        }
    }
    Ok(())
}

/// Validate a function handler of the form `<file>.<export>`.
pub fn validate_handler(handler: &str) -> Result<(), ValidationError> {
    match handler.split_once('.') {
        Some((file, export)) if !file.is_empty() && !export.is_empty() => Ok(()),
        _ => Err(ValidationError::new(
            "handler",
            format!("{handler:?} is not of the form <file>.<export>"),
        )),
    }
}

/// Validate an S3 event name such as `s3:ObjectCreated:*`.
pub fn validate_event(event: &str) -> Result<(), ValidationError> {
    if event.starts_with("s3:") && event.len() > 3 {
        Ok(())
    } else {
        Err(ValidationError::new(
            "lambdaFunctions",
            format!("{event:?} is not an S3 event name"),
        ))
    }
}
