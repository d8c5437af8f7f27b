//! Declaration registry.
//!
//! [`StackContext`] is the single entry point for declaring resources. It
//! assigns URNs, records dependency edges, and rejects declarations that
//! would reference something not yet declared. Registration order is
//! therefore always a valid dependency order.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::error::{StackError, StackResult};
use crate::graph::ResourceGraph;
use crate::resource::{ComponentResource, Declaration, Properties, Resource, ResourceOptions};
use crate::types::Urn;

/// Registry for one stack run.
#[derive(Debug)]
pub struct StackContext {
    graph: ResourceGraph,
}

impl StackContext {
    /// Create a context for `project` / `stack`.
    #[must_use]
    pub fn new(project: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            graph: ResourceGraph::new(project, stack),
        }
    }

    /// Project name.
    #[must_use]
    pub fn project(&self) -> &str {
        self.graph.project()
    }

    /// Stack name.
    #[must_use]
    pub fn stack(&self) -> &str {
        self.graph.stack()
    }

    /// Declarations so far.
    #[must_use]
    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Finish the run and hand over the declared graph.
    #[must_use]
    pub fn into_graph(self) -> ResourceGraph {
        info!(
            project = %self.graph.project(),
            stack = %self.graph.stack(),
            resources = self.graph.len(),
            "declaration pass complete",
        );
        self.graph
    }

    /// Declare a provider-backed resource.
    pub fn register_resource(
        &mut self,
        resource_type: &str,
        name: &str,
        properties: Properties,
        opts: &ResourceOptions,
    ) -> StackResult<Urn> {
        self.register(resource_type, name, true, properties, opts)
    }

    /// Declare a component resource that groups child declarations.
    pub fn register_component(
        &mut self,
        resource_type: &str,
        name: &str,
        opts: &ResourceOptions,
    ) -> StackResult<ComponentResource> {
        let urn = self.register(resource_type, name, false, Properties::new(), opts)?;
        Ok(ComponentResource::new(urn))
    }

    /// Publish the outputs of a component. Allowed once per component.
    pub fn register_outputs(
        &mut self,
        component: &ComponentResource,
        outputs: Properties,
    ) -> StackResult<()> {
        let urn = component.urn();
        let declaration = self.graph.get(urn).ok_or_else(|| StackError::UnknownDependency {
            resource: urn.name().to_owned(),
            dependency: urn.clone(),
        })?;
        if declaration.custom {
            return Err(StackError::NotAComponent(urn.clone()));
        }
        if self.graph.has_outputs(urn) {
            return Err(StackError::OutputsAlreadyRegistered(urn.clone()));
        }
        for value in outputs.values() {
            self.ensure_declared(urn.name(), &value.dependencies())?;
        }

        debug!(urn = %urn, outputs = ?outputs.keys().collect::<Vec<_>>(), "registered outputs");
        self.graph.set_outputs(urn.clone(), outputs);
        Ok(())
    }

    fn register(
        &mut self,
        resource_type: &str,
        name: &str,
        custom: bool,
        properties: Properties,
        opts: &ResourceOptions,
    ) -> StackResult<Urn> {
        let parent = opts.parent_urn().cloned();
        let qualified_type = match &parent {
            Some(parent_urn) => {
                self.ensure_declared(name, &BTreeSet::from([parent_urn.clone()]))?;
                format!("{}${resource_type}", parent_urn.qualified_type())
            }
            None => resource_type.to_owned(),
        };

        let urn = Urn::new(
            self.graph.stack(),
            self.graph.project(),
            &qualified_type,
            name,
        );
        if self.graph.contains(&urn) {
            return Err(StackError::DuplicateResource(urn));
        }

        let mut property_dependencies = BTreeMap::new();
        for (key, value) in &properties {
            let deps = value.dependencies();
            if !deps.is_empty() {
                self.ensure_declared(name, &deps)?;
                property_dependencies.insert(key.clone(), deps);
            }
        }
        let depends_on = opts.explicit_dependencies().to_vec();
        self.ensure_declared(name, &depends_on.iter().cloned().collect())?;

        debug!(
            urn = %urn,
            resource_type,
            name,
            custom,
            depends_on = depends_on.len(),
            "registered resource",
        );

        self.graph.insert(Declaration {
            urn: urn.clone(),
            resource_type: resource_type.to_owned(),
            name: name.to_owned(),
            parent,
            custom,
            properties,
            depends_on,
            property_dependencies,
        });
        Ok(urn)
    }

    fn ensure_declared(&self, resource: &str, deps: &BTreeSet<Urn>) -> StackResult<()> {
        match deps.iter().find(|urn| !self.graph.contains(urn)) {
            Some(missing) => Err(StackError::UnknownDependency {
                resource: resource.to_owned(),
                dependency: missing.clone(),
            }),
            None => Ok(()),
        }
    }
}
