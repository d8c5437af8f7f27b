//! Typed AWS resource declarations for stackwire.
//!
//! Each resource type pairs an args struct with a handle. The handle's
//! constructor validates the args, registers the declaration with a
//! [`stackwire_core::StackContext`], and exposes the provider-assigned
//! attributes as deferred [`stackwire_core::Output`] values.

pub mod dynamodb;
pub mod iam;
pub mod lambda;
pub mod preview;
pub mod s3;
pub mod validation;

pub use dynamodb::{BillingMode, ScalarAttributeType, StreamViewType, Table, TableArgs, TableAttribute};
pub use iam::{Effect, PolicyDocument, Principal, Role, RoleArgs, RolePolicy, RolePolicyArgs, Statement};
pub use lambda::{Function, FunctionArgs, Permission, PermissionArgs, Runtime};
pub use preview::PreviewResolver;
pub use s3::{Bucket, BucketArgs, BucketNotification, BucketNotificationArgs, LambdaFunctionNotification};
pub use validation::ValidationError;
