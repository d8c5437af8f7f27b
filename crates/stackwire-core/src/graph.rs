//! The declared resource graph.
//!
//! [`ResourceGraph`] is the artifact a run produces: declarations in
//! registration order with their dependency edges, plus the outputs each
//! component published. It serializes directly into the document the
//! orchestration engine consumes.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::resource::{Declaration, Properties};
use crate::types::Urn;

/// Declarations of one stack run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGraph {
    project: String,
    stack: String,
    resources: Vec<Declaration>,
    outputs: BTreeMap<Urn, Properties>,
    #[serde(skip)]
    index: HashMap<Urn, usize>,
}

impl ResourceGraph {
    /// Create an empty graph for `project` / `stack`.
    #[must_use]
    pub fn new(project: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            stack: stack.into(),
            ..Self::default()
        }
    }

    /// Project name.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Stack name.
    #[must_use]
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether nothing has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Whether `urn` has been declared.
    #[must_use]
    pub fn contains(&self, urn: &Urn) -> bool {
        self.index.contains_key(urn)
    }

    /// Look up a declaration.
    #[must_use]
    pub fn get(&self, urn: &Urn) -> Option<&Declaration> {
        self.index.get(urn).map(|&i| &self.resources[i])
    }

    /// Registration position of `urn`.
    #[must_use]
    pub fn position(&self, urn: &Urn) -> Option<usize> {
        self.index.get(urn).copied()
    }

    /// Declarations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.resources.iter()
    }

    /// Declarations of the given type token.
    pub fn of_type<'a>(&'a self, resource_type: &str) -> impl Iterator<Item = &'a Declaration> {
        self.resources
            .iter()
            .filter(move |d| d.resource_type == resource_type)
    }

    /// Outputs published by the component `urn`.
    #[must_use]
    pub fn outputs(&self, urn: &Urn) -> Option<&Properties> {
        self.outputs.get(urn)
    }

    pub(crate) fn insert(&mut self, declaration: Declaration) {
        self.index
            .insert(declaration.urn.clone(), self.resources.len());
        self.resources.push(declaration);
    }

    pub(crate) fn has_outputs(&self, urn: &Urn) -> bool {
        self.outputs.contains_key(urn)
    }

    pub(crate) fn set_outputs(&mut self, urn: Urn, outputs: Properties) {
        self.outputs.insert(urn, outputs);
    }
}
