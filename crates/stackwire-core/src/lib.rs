//! Core declaration runtime for stackwire.
//!
//! This crate provides the building blocks every stack program uses: typed
//! deferred values ([`Output`]), the declaration registry ([`StackContext`])
//! that produces a [`ResourceGraph`], the [`Resolver`] seam through which
//! provisioned values are substituted, and environment-driven
//! [`StackConfig`].
//!
//! Nothing here talks to a cloud provider. Diffing, planning and
//! provisioning belong to the orchestration engine that consumes the graph.

mod config;
mod context;
mod error;
mod graph;
mod output;
mod resolve;
mod resource;
mod types;

pub use config::StackConfig;
pub use context::StackContext;
pub use error::{StackError, StackResult};
pub use graph::ResourceGraph;
pub use output::{FileArchive, Output, PropertyRef, PropertyValue, Segment};
pub use resolve::{Resolver, resolve_properties};
pub use resource::{ComponentResource, Declaration, Properties, Resource, ResourceOptions};
pub use types::{AccountId, AwsRegion, Urn};
