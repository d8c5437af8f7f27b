//! Common identifier types shared across the workspace.

use std::fmt;

/// AWS Account ID (12-digit string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Placeholder account ID used when previewing a stack.
    pub const DEFAULT: &str = "000000000000";

    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns an error if the account ID is not a 12-digit numeric string.
    pub fn new(id: impl Into<String>) -> Result<Self, crate::StackError> {
        let id = id.into();
        if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(crate::StackError::InvalidAccountId(id));
        }
        Ok(Self(id))
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default region for previews.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique resource name of a declaration within a stack.
///
/// Layout: `urn:stackwire:<stack>::<project>::<qualified type>::<name>`, where
/// the qualified type is the parent chain of type tokens joined with `$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    const PREFIX: &str = "urn:stackwire:";

    /// Build a URN from its parts.
    #[must_use]
    pub fn new(stack: &str, project: &str, qualified_type: &str, name: &str) -> Self {
        Self(format!(
            "{}{stack}::{project}::{qualified_type}::{name}",
            Self::PREFIX
        ))
    }

    /// Get the URN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The qualified type segment (parent types joined with `$`).
    #[must_use]
    pub fn qualified_type(&self) -> &str {
        self.parts().map_or("", |(_, _, ty, _)| ty)
    }

    /// The innermost type token.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        let qualified = self.qualified_type();
        qualified.rsplit_once('$').map_or(qualified, |(_, ty)| ty)
    }

    /// The logical resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.parts().map_or("", |(_, _, _, name)| name)
    }

    fn parts(&self) -> Option<(&str, &str, &str, &str)> {
        let rest = self.0.strip_prefix(Self::PREFIX)?;
        let mut it = rest.splitn(4, "::");
        Some((it.next()?, it.next()?, it.next()?, it.next()?))
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
