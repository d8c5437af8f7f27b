//! End-to-end tests for the FileProcessor stack.
//!
//! Each test runs a full declaration pass from a [`StackConfig`] and checks
//! the declared graph, the emitted document, or its preview.
//!
//! ```text
//! cargo test -p stackwire-integration
//! ```

use std::sync::Once;

use serde_json::Value;
use stackwire_aws::PreviewResolver;
use stackwire_core::{AccountId, AwsRegion, Declaration, ResourceGraph, StackConfig};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Configuration with the three required values.
#[must_use]
pub fn stack_config(table: &str, bucket: &str, function: &str) -> StackConfig {
    StackConfig::default()
        .with_value("table", table)
        .with_value("bucket", bucket)
        .with_value("function", function)
}

/// Declare the stack, panicking on failure.
#[must_use]
pub fn declare(config: &StackConfig) -> ResourceGraph {
    init_tracing();
    stackwire_fileprocessor::declare(config).expect("declaration should succeed")
}

/// The only declaration of `resource_type`.
#[must_use]
pub fn single<'a>(graph: &'a ResourceGraph, resource_type: &str) -> &'a Declaration {
    let mut matches = graph.of_type(resource_type);
    let first = matches.next().unwrap_or_else(|| panic!("no {resource_type} declared"));
    assert!(matches.next().is_none(), "more than one {resource_type} declared");
    first
}

/// Declaration named `name` of `resource_type`.
#[must_use]
pub fn named<'a>(graph: &'a ResourceGraph, resource_type: &str, name: &str) -> &'a Declaration {
    graph
        .of_type(resource_type)
        .find(|d| d.name == name)
        .unwrap_or_else(|| panic!("no {resource_type} named {name}"))
}

/// Fully substituted preview of `graph` with default account and region.
#[must_use]
pub fn preview(graph: &ResourceGraph) -> Value {
    PreviewResolver::new(graph, AccountId::default(), AwsRegion::default())
        .render()
        .expect("preview should resolve")
}

/// Preview of the declaration `name` of `resource_type`.
#[must_use]
pub fn previewed<'a>(document: &'a Value, resource_type: &str, name: &str) -> &'a Value {
    document["resources"]
        .as_array()
        .expect("resources array")
        .iter()
        .find(|r| r["type"] == resource_type && r["name"] == name)
        .unwrap_or_else(|| panic!("no previewed {resource_type} named {name}"))
}

mod test_config;
mod test_declaration;
mod test_document;
mod test_preview;
