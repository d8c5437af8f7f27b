//! IAM roles, inline role policies, and policy documents.

use serde_json::{Map, Value, json};
use stackwire_core::{
    Output, Properties, Resource, ResourceOptions, StackContext, StackResult, Urn,
};

use crate::validation::validate_policy;

/// Policy language version used by every document built here.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Effect {
    /// Grant the actions.
    #[default]
    Allow,
    /// Refuse the actions.
    Deny,
}

impl Effect {
    /// Returns the policy-language string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Principal of a trust statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// An AWS service, e.g. `lambda.amazonaws.com`.
    Service(String),
}

impl Principal {
    fn to_json(&self) -> Value {
        match self {
            Self::Service(service) => json!({ "Service": service }),
        }
    }
}

/// One statement of a policy document.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Allow or deny.
    pub effect: Effect,
    /// Principal, for trust policies.
    pub principal: Option<Principal>,
    /// Actions covered.
    pub actions: Vec<String>,
    /// Resources covered; entries may be deferred.
    pub resources: Vec<Output<String>>,
}

impl Statement {
    /// An `Allow` statement for `actions`.
    #[must_use]
    pub fn allow<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            effect: Effect::Allow,
            principal: None,
            actions: actions.into_iter().map(Into::into).collect(),
            resources: Vec::new(),
        }
    }

    /// Restrict the statement to a principal.
    #[must_use]
    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Add a covered resource.
    #[must_use]
    pub fn resource(mut self, resource: impl Into<Output<String>>) -> Self {
        self.resources.push(resource.into());
        self
    }
}

/// An IAM policy document.
///
/// Documents render to a JSON string output. Deferred resource entries are
/// kept deferred, so a policy that names a bucket ARN becomes an
/// interpolation the engine completes once the bucket exists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicyDocument {
    /// Statements in order.
    pub statements: Vec<Statement>,
}

impl PolicyDocument {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement.
    #[must_use]
    pub fn statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Trust policy letting `service` assume a role.
    #[must_use]
    pub fn assume_role(service: &str) -> Self {
        Self::new().statement(
            Statement::allow(["sts:AssumeRole"]).principal(Principal::Service(service.to_owned())),
        )
    }

    /// Render the document to JSON text.
    #[must_use]
    pub fn render(&self) -> Output<String> {
        let mut deferred: Vec<Output<String>> = Vec::new();

        let statements: Vec<Value> = self
            .statements
            .iter()
            .map(|stmt| {
                let mut obj = Map::new();
                obj.insert("Effect".to_owned(), Value::from(stmt.effect.as_str()));
                if let Some(principal) = &stmt.principal {
                    obj.insert("Principal".to_owned(), principal.to_json());
                }
                obj.insert("Action".to_owned(), json!(stmt.actions));
                if !stmt.resources.is_empty() {
                    let resources: Vec<Value> = stmt
                        .resources
                        .iter()
                        .map(|res| match res.known_value() {
                            Some(text) => Value::from(text),
                            None => {
                                let marker = marker(deferred.len());
                                deferred.push(res.clone());
                                Value::from(marker)
                            }
                        })
                        .collect();
                    obj.insert("Resource".to_owned(), Value::Array(resources));
                }
                Value::Object(obj)
            })
            .collect();

        let text = json!({ "Version": POLICY_VERSION, "Statement": statements }).to_string();
        if deferred.is_empty() {
            return Output::known(text);
        }

        let mut parts = Vec::with_capacity(deferred.len() * 2 + 1);
        let mut rest = text.as_str();
        for (i, value) in deferred.into_iter().enumerate() {
            let marker = marker(i);
            if let Some((head, tail)) = rest.split_once(marker.as_str()) {
                parts.push(Output::known(head));
                parts.push(value);
                rest = tail;
            }
        }
        parts.push(Output::known(rest));
        Output::concat(parts)
    }
}

fn marker(index: usize) -> String {
    format!("__stackwire_deferred_{index}__")
}

/// Arguments of a [`Role`].
#[derive(Debug, Clone)]
pub struct RoleArgs {
    /// Physical role name.
    pub name: Option<Output<String>>,
    /// Trust policy JSON.
    pub assume_role_policy: Output<String>,
}

/// An IAM role.
#[derive(Debug, Clone)]
pub struct Role {
    urn: Urn,
}

impl Role {
    /// Type token.
    pub const TYPE: &str = "aws:iam/role:Role";

    /// Declare a role.
    pub fn new(
        ctx: &mut StackContext,
        name: &str,
        args: RoleArgs,
        opts: &ResourceOptions,
    ) -> StackResult<Self> {
        validate_policy("assumeRolePolicy", &args.assume_role_policy)
            .map_err(|e| e.for_resource(name))?;

        let mut props = Properties::new();
        if let Some(role_name) = args.name {
            props.insert("name".to_owned(), role_name.into());
        }
        props.insert("assumeRolePolicy".to_owned(), args.assume_role_policy.into());

        let urn = ctx.register_resource(Self::TYPE, name, props, opts)?;
        Ok(Self { urn })
    }

    /// Provider id.
    #[must_use]
    pub fn id(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "id")
    }

    /// Role ARN.
    #[must_use]
    pub fn arn(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "arn")
    }

    /// Physical role name.
    #[must_use]
    pub fn name(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "name")
    }
}

impl Resource for Role {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}

/// Arguments of a [`RolePolicy`].
#[derive(Debug, Clone)]
pub struct RolePolicyArgs {
    /// Role the policy is attached to (name).
    pub role: Output<String>,
    /// Policy JSON.
    pub policy: Output<String>,
}

/// An inline policy attached to a role.
#[derive(Debug, Clone)]
pub struct RolePolicy {
    urn: Urn,
}

impl RolePolicy {
    /// Type token.
    pub const TYPE: &str = "aws:iam/rolePolicy:RolePolicy";

    /// Attach an inline policy.
    pub fn new(
        ctx: &mut StackContext,
        name: &str,
        args: RolePolicyArgs,
        opts: &ResourceOptions,
    ) -> StackResult<Self> {
        validate_policy("policy", &args.policy).map_err(|e| e.for_resource(name))?;

        let mut props = Properties::new();
        props.insert("role".to_owned(), args.role.into());
        props.insert("policy".to_owned(), args.policy.into());

        let urn = ctx.register_resource(Self::TYPE, name, props, opts)?;
        Ok(Self { urn })
    }

    /// Provider id.
    #[must_use]
    pub fn id(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "id")
    }
}

impl Resource for RolePolicy {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}
