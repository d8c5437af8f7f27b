//! Stack program entry.

use stackwire_core::{ResourceGraph, ResourceOptions, StackConfig, StackContext, StackResult};
use tracing::info;

use crate::component::{FileProcessor, FileProcessorArgs};

/// Name of the component declared by [`run`].
pub const COMPONENT_NAME: &str = "sync-stream";

const REQUIRED_KEYS: [&str; 3] = ["table", "bucket", "function"];

/// Declare the stack into `ctx`.
///
/// Every required configuration value is checked before the first
/// declaration, so a missing value leaves `ctx` untouched.
pub fn run(ctx: &mut StackContext, config: &StackConfig) -> StackResult<FileProcessor> {
    let [table, bucket, function] = config.require_all(REQUIRED_KEYS)?;
    info!(table, bucket, function, "declaring {COMPONENT_NAME}");

    FileProcessor::new(
        ctx,
        COMPONENT_NAME,
        FileProcessorArgs::builder()
            .table_name(table)
            .bucket_name(bucket)
            .function_name(function)
            .build(),
        &ResourceOptions::new(),
    )
}

/// Run the program in a fresh context and return the declared graph.
pub fn declare(config: &StackConfig) -> StackResult<ResourceGraph> {
    let mut ctx = StackContext::new(config.project.as_str(), config.stack.as_str());
    run(&mut ctx, config)?;
    Ok(ctx.into_graph())
}

#[cfg(test)]
mod tests {
    use stackwire_core::{Resource, StackError};

    use super::*;

    fn config() -> StackConfig {
        StackConfig::default()
            .with_value("table", "orders")
            .with_value("bucket", "uploads")
            .with_value("function", "processor")
    }

    #[test]
    fn test_should_declare_named_component() {
        let mut ctx = StackContext::new("file-processor", "dev");
        let fp = run(&mut ctx, &config()).unwrap();
        assert_eq!(fp.urn().name(), COMPONENT_NAME);
        assert_eq!(ctx.graph().len(), 10);
    }

    #[test]
    fn test_should_report_every_missing_key() {
        let mut ctx = StackContext::new("file-processor", "dev");
        let err = run(&mut ctx, &StackConfig::default().with_value("bucket", "uploads")).unwrap_err();

        match err {
            StackError::MissingConfig(keys) => assert_eq!(keys, ["table", "function"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(ctx.graph().is_empty());
    }

    #[test]
    fn test_should_read_namespaced_values() {
        let config = StackConfig::default()
            .with_value("file-processor:table", "orders")
            .with_value("file-processor:bucket", "uploads")
            .with_value("function", "processor");
        let graph = declare(&config).unwrap();
        assert_eq!(graph.project(), "file-processor");
        assert_eq!(graph.len(), 10);
    }
}
