//! S3 buckets and bucket notifications.

use std::collections::BTreeMap;

use stackwire_core::{
    Output, Properties, PropertyValue, Resource, ResourceOptions, StackContext, StackResult, Urn,
};

use crate::validation::{ValidationError, validate_event};

/// Event emitted for every new object, whatever the API used to create it.
pub const OBJECT_CREATED_ALL: &str = "s3:ObjectCreated:*";

/// Arguments of a [`Bucket`].
#[derive(Debug, Clone, Default)]
pub struct BucketArgs {
    /// Physical bucket name.
    pub bucket: Option<Output<String>>,
}

/// An S3 bucket.
#[derive(Debug, Clone)]
pub struct Bucket {
    urn: Urn,
}

impl Bucket {
    /// Type token.
    pub const TYPE: &str = "aws:s3/bucket:Bucket";

    /// Declare a bucket.
    ///
    /// The bucket name is passed through as given; naming rules are enforced
    /// by the provider when the engine creates the bucket.
    pub fn new(
        ctx: &mut StackContext,
        name: &str,
        args: BucketArgs,
        opts: &ResourceOptions,
    ) -> StackResult<Self> {
        let mut props = Properties::new();
        if let Some(bucket) = args.bucket {
            props.insert("bucket".to_owned(), bucket.into());
        }

        let urn = ctx.register_resource(Self::TYPE, name, props, opts)?;
        Ok(Self { urn })
    }

    /// Provider id (the bucket name).
    #[must_use]
    pub fn id(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "id")
    }

    /// Bucket ARN.
    #[must_use]
    pub fn arn(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "arn")
    }

    /// Physical bucket name.
    #[must_use]
    pub fn bucket(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "bucket")
    }
}

impl Resource for Bucket {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}

/// A Lambda target of a bucket notification.
#[derive(Debug, Clone)]
pub struct LambdaFunctionNotification {
    /// Function invoked.
    pub lambda_function_arn: Output<String>,
    /// Events that trigger the invocation.
    pub events: Vec<String>,
}

impl LambdaFunctionNotification {
    /// Invoke `function_arn` on `events`.
    #[must_use]
    pub fn new<I, S>(function_arn: Output<String>, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lambda_function_arn: function_arn,
            events: events.into_iter().map(Into::into).collect(),
        }
    }

    fn into_property(self) -> PropertyValue {
        let mut obj = BTreeMap::new();
        obj.insert(
            "lambdaFunctionArn".to_owned(),
            self.lambda_function_arn.into(),
        );
        obj.insert(
            "events".to_owned(),
            PropertyValue::Array(self.events.into_iter().map(PropertyValue::from).collect()),
        );
        PropertyValue::Object(obj)
    }
}

/// Arguments of a [`BucketNotification`].
#[derive(Debug, Clone)]
pub struct BucketNotificationArgs {
    /// Bucket id.
    pub bucket: Output<String>,
    /// Lambda targets.
    pub lambda_functions: Vec<LambdaFunctionNotification>,
}

/// Event subscription of a bucket.
#[derive(Debug, Clone)]
pub struct BucketNotification {
    urn: Urn,
}

impl BucketNotification {
    /// Type token.
    pub const TYPE: &str = "aws:s3/bucketNotification:BucketNotification";

    /// Declare a notification configuration.
    pub fn new(
        ctx: &mut StackContext,
        name: &str,
        args: BucketNotificationArgs,
        opts: &ResourceOptions,
    ) -> StackResult<Self> {
        if args.lambda_functions.is_empty() {
            return Err(
                ValidationError::new("lambdaFunctions", "at least one target is required")
                    .for_resource(name),
            );
        }
        for target in &args.lambda_functions {
            if target.events.is_empty() {
                return Err(ValidationError::new("lambdaFunctions", "target has no events")
                    .for_resource(name));
            }
            for event in &target.events {
                validate_event(event).map_err(|e| e.for_resource(name))?;
            }
        }

        let mut props = Properties::new();
        props.insert("bucket".to_owned(), args.bucket.into());
        props.insert(
            "lambdaFunctions".to_owned(),
            PropertyValue::Array(
                args.lambda_functions
                    .into_iter()
                    .map(LambdaFunctionNotification::into_property)
                    .collect(),
            ),
        );

        let urn = ctx.register_resource(Self::TYPE, name, props, opts)?;
        Ok(Self { urn })
    }

    /// Provider id.
    #[must_use]
    pub fn id(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "id")
    }
}

impl Resource for BucketNotification {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}
