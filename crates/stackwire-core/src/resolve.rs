//! Substitution of deferred values.
//!
//! The orchestration engine owns resolution in a real run. The [`Resolver`]
//! trait is the seam it plugs into; tests and previews supply their own.

use serde_json::Value;

use crate::error::{StackError, StackResult};
use crate::output::{PropertyRef, PropertyValue, Segment};
use crate::resource::Properties;

/// Supplies provisioned values for property references.
pub trait Resolver {
    /// Value of `reference`, or `None` if it is not available.
    fn resolve(&self, reference: &PropertyRef) -> Option<Value>;
}

impl<F> Resolver for F
where
    F: Fn(&PropertyRef) -> Option<Value>,
{
    fn resolve(&self, reference: &PropertyRef) -> Option<Value> {
        self(reference)
    }
}

impl PropertyValue {
    /// Substitute every deferred part using `resolver`.
    pub fn resolve(&self, resolver: &dyn Resolver) -> StackResult<Value> {
        match self {
            Self::Reference(r) => lookup(resolver, r),
            Self::Interpolation(segments) => {
                let mut text = String::new();
                for segment in segments {
                    match segment {
                        Segment::Literal(s) => text.push_str(s),
                        Segment::Reference(r) => match lookup(resolver, r)? {
                            Value::String(s) => text.push_str(&s),
                            other => text.push_str(&other.to_string()),
                        },
                    }
                }
                Ok(Value::String(text))
            }
            Self::Array(items) => items
                .iter()
                .map(|v| v.resolve(resolver))
                .collect::<StackResult<Vec<_>>>()
                .map(Value::Array),
            Self::Object(map) => resolve_properties(map, resolver),
            known => Ok(known.to_json()),
        }
    }
}

/// Resolve a whole property map into a JSON object.
pub fn resolve_properties(properties: &Properties, resolver: &dyn Resolver) -> StackResult<Value> {
    let mut out = serde_json::Map::new();
    for (key, value) in properties {
        out.insert(key.clone(), value.resolve(resolver)?);
    }
    Ok(Value::Object(out))
}

fn lookup(resolver: &dyn Resolver, reference: &PropertyRef) -> StackResult<Value> {
    resolver
        .resolve(reference)
        .ok_or_else(|| StackError::Unresolved {
            urn: reference.urn.clone(),
            property: reference.property.clone(),
        })
}
