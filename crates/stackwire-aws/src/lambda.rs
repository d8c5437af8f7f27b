//! Lambda functions and invocation permissions.

use std::collections::BTreeMap;

use serde::Serialize;
use stackwire_core::{
    FileArchive, Output, Properties, PropertyValue, Resource, ResourceOptions, StackContext,
    StackResult, Urn,
};
use tracing::warn;
use typed_builder::TypedBuilder;

use crate::validation::{ValidationError, validate_handler};

/// Lambda runtime identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    /// Node.js 16 (deprecated by AWS).
    NodeJs16x,
    /// Node.js 18.
    NodeJs18x,
    /// Node.js 20.
    NodeJs20x,
    /// Node.js 22.
    NodeJs22x,
    /// Python 3.11.
    Python311,
    /// Python 3.12.
    Python312,
    /// Java 21.
    Java21,
    /// Custom runtime on Amazon Linux 2.
    ProvidedAl2,
    /// Custom runtime on Amazon Linux 2023.
    ProvidedAl2023,
}

impl Runtime {
    /// Returns the Lambda API string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NodeJs16x => "nodejs16.x",
            Self::NodeJs18x => "nodejs18.x",
            Self::NodeJs20x => "nodejs20.x",
            Self::NodeJs22x => "nodejs22.x",
            Self::Python311 => "python3.11",
            Self::Python312 => "python3.12",
            Self::Java21 => "java21",
            Self::ProvidedAl2 => "provided.al2",
            Self::ProvidedAl2023 => "provided.al2023",
        }
    }

    /// Whether AWS no longer accepts new functions on this runtime.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::NodeJs16x)
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Runtime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Arguments of a [`Function`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct FunctionArgs {
    /// Physical function name.
    #[builder(default, setter(strip_option, into))]
    pub name: Option<Output<String>>,
    /// Entry point, `<file>.<export>`.
    #[builder(setter(into))]
    pub handler: String,
    /// Execution role ARN.
    pub role: Output<String>,
    /// Runtime.
    pub runtime: Runtime,
    /// Packaged code.
    pub code: Output<FileArchive>,
    /// Environment variables.
    #[builder(default)]
    pub environment: BTreeMap<String, Output<String>>,
}

/// A Lambda function.
#[derive(Debug, Clone)]
pub struct Function {
    urn: Urn,
}

impl Function {
    /// Type token.
    pub const TYPE: &str = "aws:lambda/function:Function";

    /// Declare a function.
    pub fn new(
        ctx: &mut StackContext,
        name: &str,
        args: FunctionArgs,
        opts: &ResourceOptions,
    ) -> StackResult<Self> {
        validate_handler(&args.handler).map_err(|e| e.for_resource(name))?;
        if args.runtime.is_deprecated() {
            warn!(function = name, runtime = %args.runtime, "runtime is deprecated");
        }

        let mut props = Properties::new();
        if let Some(fn_name) = args.name {
            props.insert("name".to_owned(), fn_name.into());
        }
        props.insert("handler".to_owned(), args.handler.into());
        props.insert("role".to_owned(), args.role.into());
        props.insert("runtime".to_owned(), args.runtime.as_str().into());
        props.insert("code".to_owned(), args.code.into());
        if !args.environment.is_empty() {
            let variables: BTreeMap<String, PropertyValue> = args
                .environment
                .into_iter()
                .map(|(k, v)| (k, v.into()))
                .collect();
            let mut environment = BTreeMap::new();
            environment.insert("variables".to_owned(), PropertyValue::Object(variables));
            props.insert("environment".to_owned(), PropertyValue::Object(environment));
        }

        let urn = ctx.register_resource(Self::TYPE, name, props, opts)?;
        Ok(Self { urn })
    }

    /// Provider id.
    #[must_use]
    pub fn id(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "id")
    }

    /// Function ARN.
    #[must_use]
    pub fn arn(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "arn")
    }

    /// Physical function name.
    #[must_use]
    pub fn name(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "name")
    }
}

impl Resource for Function {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}

/// Arguments of a [`Permission`].
#[derive(Debug, Clone)]
pub struct PermissionArgs {
    /// Action granted, e.g. `lambda:InvokeFunction`.
    pub action: String,
    /// Function name or ARN.
    pub function: Output<String>,
    /// Principal granted the action, e.g. `s3.amazonaws.com`.
    pub principal: String,
    /// Only invocations from this source ARN are allowed.
    pub source_arn: Option<Output<String>>,
}

/// Permission for a principal to invoke a function.
#[derive(Debug, Clone)]
pub struct Permission {
    urn: Urn,
}

impl Permission {
    /// Type token.
    pub const TYPE: &str = "aws:lambda/permission:Permission";

    /// Declare a permission.
    pub fn new(
        ctx: &mut StackContext,
        name: &str,
        args: PermissionArgs,
        opts: &ResourceOptions,
    ) -> StackResult<Self> {
        if !args.action.starts_with("lambda:") {
            return Err(ValidationError::new(
                "action",
                format!("{:?} is not a lambda action", args.action),
            )
            .for_resource(name));
        }
        if args.principal.is_empty() {
            return Err(ValidationError::new("principal", "principal must not be empty")
                .for_resource(name));
        }

        let mut props = Properties::new();
        props.insert("action".to_owned(), args.action.into());
        props.insert("function".to_owned(), args.function.into());
        props.insert("principal".to_owned(), args.principal.into());
        if let Some(source_arn) = args.source_arn {
            props.insert("sourceArn".to_owned(), source_arn.into());
        }

        let urn = ctx.register_resource(Self::TYPE, name, props, opts)?;
        Ok(Self { urn })
    }

    /// Provider id.
    #[must_use]
    pub fn id(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "id")
    }
}

impl Resource for Permission {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}
