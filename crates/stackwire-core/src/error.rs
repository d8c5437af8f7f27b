//! Error types for stack declaration.

use crate::types::Urn;

/// Core error type for stack declaration.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    /// Invalid AWS account ID format.
    #[error("invalid AWS account ID: {0} (must be 12-digit numeric string)")]
    InvalidAccountId(String),

    /// One or more required configuration keys are absent.
    #[error("missing required configuration value(s): {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    /// Configuration source could not be read or parsed.
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// A resource with the same URN was already declared.
    #[error("duplicate resource: {0}")]
    DuplicateResource(Urn),

    /// A declaration references a resource that was not declared before it.
    #[error("resource {resource} depends on undeclared resource {dependency}")]
    UnknownDependency {
        /// The declaration being registered.
        resource: String,
        /// The missing URN.
        dependency: Urn,
    },

    /// A declared property failed validation.
    #[error("invalid property `{property}` on {resource}: {reason}")]
    InvalidProperty {
        /// Logical name of the resource.
        resource: String,
        /// Property name.
        property: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A deferred value could not be resolved.
    #[error("unresolved reference to `{property}` of {urn}")]
    Unresolved {
        /// Referenced resource.
        urn: Urn,
        /// Referenced property.
        property: String,
    },

    /// Outputs were registered twice for the same component.
    #[error("outputs already registered for {0}")]
    OutputsAlreadyRegistered(Urn),

    /// Outputs were registered for a custom (non-component) resource.
    #[error("{0} is not a component resource")]
    NotAComponent(Urn),
}

impl StackError {
    /// Build an [`StackError::InvalidProperty`] error.
    #[must_use]
    pub fn invalid_property(
        resource: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            resource: resource.into(),
            property: property.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for stack operations.
pub type StackResult<T> = Result<T, StackError>;
