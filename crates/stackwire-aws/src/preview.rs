//! Local preview of a declared graph.
//!
//! [`PreviewResolver`] stands in for the engine: it synthesizes the values a
//! provider would assign (ids, ARNs) from the declared names so every
//! deferred value in the graph can be substituted and inspected without
//! provisioning anything.

use serde_json::{Map, Value, json};
use stackwire_core::{
    AccountId, AwsRegion, Declaration, PropertyRef, ResourceGraph, Resolver, StackResult,
    resolve_properties,
};
use tracing::debug;

use crate::dynamodb::Table;
use crate::iam::Role;
use crate::lambda::Function;
use crate::s3::Bucket;

/// Resolves references from a declared graph with provider-style values.
#[derive(Debug, Clone)]
pub struct PreviewResolver<'a> {
    graph: &'a ResourceGraph,
    account: AccountId,
    region: AwsRegion,
}

impl<'a> PreviewResolver<'a> {
    /// Create a resolver over `graph`.
    #[must_use]
    pub fn new(graph: &'a ResourceGraph, account: AccountId, region: AwsRegion) -> Self {
        Self {
            graph,
            account,
            region,
        }
    }

    /// Render the whole graph with every deferred value substituted.
    pub fn render(&self) -> StackResult<Value> {
        let mut resources = Vec::with_capacity(self.graph.len());
        let mut outputs = Map::new();

        for declaration in self.graph.iter() {
            resources.push(json!({
                "urn": declaration.urn,
                "type": declaration.resource_type,
                "name": declaration.name,
                "properties": resolve_properties(&declaration.properties, self)?,
            }));
            if let Some(published) = self.graph.outputs(&declaration.urn) {
                outputs.insert(
                    declaration.urn.to_string(),
                    resolve_properties(published, self)?,
                );
            }
        }

        debug!(resources = resources.len(), "rendered preview");
        Ok(json!({
            "project": self.graph.project(),
            "stack": self.graph.stack(),
            "account": self.account,
            "region": self.region,
            "resources": resources,
            "outputs": outputs,
        }))
    }

    /// Physical name: the declared name property, or the logical name.
    fn physical_name(&self, declaration: &Declaration) -> Option<String> {
        let key = if declaration.resource_type == Bucket::TYPE {
            "bucket"
        } else {
            "name"
        };
        match declaration.property(key) {
            Some(value) => match value.resolve(self).ok()? {
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            },
            None => Some(declaration.name.clone()),
        }
    }
}

impl Resolver for PreviewResolver<'_> {
    fn resolve(&self, reference: &PropertyRef) -> Option<Value> {
        let declaration = self.graph.get(&reference.urn)?;
        let property = reference.property.as_str();
        if property == "urn" {
            return Some(Value::from(declaration.urn.as_str()));
        }

        let name = self.physical_name(declaration)?;
        let (account, region) = (&self.account, &self.region);
        let value = match (declaration.resource_type.as_str(), property) {
            (Bucket::TYPE, "arn") => format!("arn:aws:s3:::{name}"),
            (Role::TYPE, "arn") => format!("arn:aws:iam::{account}:role/{name}"),
            (Function::TYPE, "arn") => {
                format!("arn:aws:lambda:{region}:{account}:function:{name}")
            }
            (Table::TYPE, "arn") => format!("arn:aws:dynamodb:{region}:{account}:table/{name}"),
            (Bucket::TYPE, "bucket") | (_, "id" | "name") => name,
            (_, other) => return declaration.property(other)?.resolve(self).ok(),
        };
        Some(Value::String(value))
    }
}
