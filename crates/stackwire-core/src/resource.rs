//! Resource declarations and declaration options.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::output::PropertyValue;
use crate::types::Urn;

/// Input properties of a declaration, ordered by name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Anything that has been declared and can be depended upon.
pub trait Resource {
    /// URN of the declaration.
    fn urn(&self) -> &Urn;
}

/// Handle of a registered component resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentResource {
    urn: Urn,
}

impl ComponentResource {
    pub(crate) fn new(urn: Urn) -> Self {
        Self { urn }
    }
}

impl Resource for ComponentResource {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}

/// Options applied to a single declaration.
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    parent: Option<Urn>,
    depends_on: Vec<Urn>,
}

impl ResourceOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the resource as a child of `parent`.
    #[must_use]
    pub fn parent(mut self, parent: &dyn Resource) -> Self {
        self.parent = Some(parent.urn().clone());
        self
    }

    /// Add an explicit ordering dependency on `resource`.
    #[must_use]
    pub fn depends_on(mut self, resource: &dyn Resource) -> Self {
        let urn = resource.urn().clone();
        if !self.depends_on.contains(&urn) {
            self.depends_on.push(urn);
        }
        self
    }

    /// Parent URN, if any.
    #[must_use]
    pub fn parent_urn(&self) -> Option<&Urn> {
        self.parent.as_ref()
    }

    /// Explicit dependencies in insertion order.
    #[must_use]
    pub fn explicit_dependencies(&self) -> &[Urn] {
        &self.depends_on
    }
}

/// One declared resource as handed to the orchestration engine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    /// Unique resource name.
    pub urn: Urn,
    /// Type token, e.g. `aws:s3/bucket:Bucket`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Logical name.
    pub name: String,
    /// Parent component, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Urn>,
    /// `true` for provider-backed resources, `false` for components.
    pub custom: bool,
    /// Declared input properties.
    pub properties: Properties,
    /// Explicit ordering dependencies.
    pub depends_on: Vec<Urn>,
    /// Resources each property reads deferred values from.
    pub property_dependencies: BTreeMap<String, BTreeSet<Urn>>,
}

impl Declaration {
    /// Look up an input property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Explicit and implicit dependencies combined.
    #[must_use]
    pub fn all_dependencies(&self) -> BTreeSet<Urn> {
        self.depends_on
            .iter()
            .chain(self.property_dependencies.values().flatten())
            .cloned()
            .collect()
    }
}

impl Resource for Declaration {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}
