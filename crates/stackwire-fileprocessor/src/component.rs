//! The FileProcessor component.

use std::collections::BTreeMap;

use stackwire_aws::lambda::PermissionArgs;
use stackwire_aws::s3::OBJECT_CREATED_ALL;
use stackwire_aws::{
    BillingMode, Bucket, BucketArgs, BucketNotification, BucketNotificationArgs, Function,
    FunctionArgs, LambdaFunctionNotification, Permission, Role, RoleArgs, RolePolicy,
    RolePolicyArgs, Runtime, StreamViewType, Table, TableArgs, TableAttribute,
};
use stackwire_core::{
    ComponentResource, Output, Properties, Resource, ResourceOptions, StackContext, StackResult,
    Urn,
};
use tracing::{debug, info};
use typed_builder::TypedBuilder;

use crate::policies;

const HANDLER: &str = "index.handler";
const RUNTIME: Runtime = Runtime::NodeJs16x;
const CODE_PATH: &str = "./lambda";
const TABLE_NAME_VAR: &str = "TABLE_NAME";
const PARTITION_KEY: &str = "Key";
const S3_SERVICE: &str = "s3.amazonaws.com";
const INVOKE_ACTION: &str = "lambda:InvokeFunction";

/// Inputs of a [`FileProcessor`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct FileProcessorArgs {
    /// Physical table name, exported to the function as `TABLE_NAME`.
    #[builder(setter(into))]
    pub table_name: Output<String>,
    /// Physical bucket name.
    #[builder(setter(into))]
    pub bucket_name: Output<String>,
    /// Requested function name. The function itself is named after the
    /// component.
    #[builder(setter(into))]
    pub function_name: Output<String>,
}

/// A bucket that feeds new objects to a function writing into a streaming
/// table.
///
/// Declaration order:
///
/// | Step | Resource | Logical name |
/// |------|----------|--------------|
/// | 1 | component | `<name>` |
/// | 2 | bucket | `<name>` |
/// | 3 | execution role | `<name>-role` |
/// | 4 | bucket read policy | `<name>-bucketPolicy` |
/// | 5 | table write policy | `<name>-dynamoPolicy` |
/// | 6 | log write policy | `<name>-logPolicy` |
/// | 7 | function (after the bucket) | `<name>` |
/// | 8 | invoke permission for S3 | `<name>-permission` |
/// | 9 | object-created notification (after the permission) | `<name>-objectCreated` |
/// | 10 | table | `<name>` |
#[derive(Debug, Clone)]
pub struct FileProcessor {
    component: ComponentResource,
    bucket: Bucket,
    function: Function,
    table: Table,
}

impl FileProcessor {
    /// Type token of the component.
    pub const TYPE: &str = "components:fileProcessor:fileProcessor";

    /// Declare the component and all of its resources.
    ///
    /// The first failing declaration aborts the rest and its error is
    /// returned as is.
    pub fn new(
        ctx: &mut StackContext,
        name: &str,
        args: FileProcessorArgs,
        opts: &ResourceOptions,
    ) -> StackResult<Self> {
        let component = ctx.register_component(Self::TYPE, name, opts)?;
        let child = ResourceOptions::new().parent(&component);

        if let Some(requested) = args.function_name.known_value() {
            debug!(requested, declared = name, "function is named after the component");
        }

        let bucket = Bucket::new(
            ctx,
            name,
            BucketArgs {
                bucket: Some(args.bucket_name),
            },
            &child,
        )?;

        let role = Role::new(
            ctx,
            &format!("{name}-role"),
            RoleArgs {
                name: Some(Output::known(name)),
                assume_role_policy: policies::assume_role(),
            },
            &child,
        )?;

        for (suffix, policy) in [
            ("bucketPolicy", policies::bucket_read(bucket.id())),
            ("dynamoPolicy", policies::table_write()),
            ("logPolicy", policies::log_write()),
        ] {
            RolePolicy::new(
                ctx,
                &format!("{name}-{suffix}"),
                RolePolicyArgs {
                    role: role.name(),
                    policy,
                },
                &child,
            )?;
        }

        let mut environment = BTreeMap::new();
        environment.insert(TABLE_NAME_VAR.to_owned(), args.table_name.clone());
        let function = Function::new(
            ctx,
            name,
            FunctionArgs::builder()
                .name(name)
                .handler(HANDLER)
                .role(role.arn())
                .runtime(RUNTIME)
                .code(Output::file_archive(CODE_PATH))
                .environment(environment)
                .build(),
            &child.clone().depends_on(&bucket),
        )?;

        let permission = Permission::new(
            ctx,
            &format!("{name}-permission"),
            PermissionArgs {
                action: INVOKE_ACTION.to_owned(),
                function: function.name(),
                principal: S3_SERVICE.to_owned(),
                source_arn: Some(bucket.arn()),
            },
            &child,
        )?;

        BucketNotification::new(
            ctx,
            &format!("{name}-objectCreated"),
            BucketNotificationArgs {
                bucket: bucket.id(),
                lambda_functions: vec![LambdaFunctionNotification::new(
                    function.arn(),
                    [OBJECT_CREATED_ALL],
                )],
            },
            &child.clone().depends_on(&permission),
        )?;

        let table = Table::new(
            ctx,
            name,
            TableArgs {
                name: Some(args.table_name),
                attributes: vec![TableAttribute::string(PARTITION_KEY)],
                hash_key: PARTITION_KEY.to_owned(),
                billing_mode: BillingMode::PayPerRequest,
                stream_enabled: true,
                stream_view_type: Some(StreamViewType::NewImage),
            },
            &child,
        )?;

        let outputs: Properties = [
            ("bucket", bucket.urn()),
            ("lambda", function.urn()),
            ("table", table.urn()),
        ]
        .into_iter()
        .map(|(key, urn)| {
            let handle: Output<String> = Output::reference(urn.clone(), "urn");
            (key.to_owned(), handle.into())
        })
        .collect();
        ctx.register_outputs(&component, outputs)?;

        info!(component = %component.urn(), "declared file processor");
        Ok(Self {
            component,
            bucket,
            function,
            table,
        })
    }

    /// The upload bucket.
    #[must_use]
    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// The processing function.
    #[must_use]
    pub fn function(&self) -> &Function {
        &self.function
    }

    /// The destination table.
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }
}

impl Resource for FileProcessor {
    fn urn(&self) -> &Urn {
        self.component.urn()
    }
}
