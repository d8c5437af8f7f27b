//! Configuration loading and required values.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use stackwire_core::{StackConfig, StackContext, StackError};
    use stackwire_fileprocessor::run;

    use crate::{declare, stack_config};

    #[test]
    fn test_should_abort_before_declaring_when_any_value_is_missing() {
        for missing in ["table", "bucket", "function"] {
            let mut config = stack_config("orders", "uploads", "processor");
            config.values.remove(missing);

            let mut ctx = StackContext::new("file-processor", "dev");
            let err = run(&mut ctx, &config).unwrap_err();

            assert!(
                matches!(&err, StackError::MissingConfig(keys) if keys == &[missing.to_owned()]),
                "unexpected error for {missing}: {err}"
            );
            assert!(ctx.graph().is_empty(), "{missing}: nothing may be declared");
        }
    }

    #[test]
    fn test_should_report_all_missing_values_together() {
        let err = stackwire_fileprocessor::declare(&StackConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required configuration value(s): table, bucket, function"
        );
    }

    #[test]
    fn test_should_load_config_file_with_inline_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"config": {{"file-processor:table": "orders", "file-processor:bucket": "uploads", "file-processor:function": "processor"}}}}"#
        )
        .unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config = StackConfig::from_lookup(|key| match key {
            "STACKWIRE_CONFIG_FILE" => Some(path.clone()),
            "STACKWIRE_CONFIG" => Some(r#"{"file-processor:bucket": "incoming"}"#.to_owned()),
            "STACKWIRE_STACK" => Some("prod".to_owned()),
            _ => None,
        })
        .unwrap();

        let graph = declare(&config);
        assert_eq!(graph.stack(), "prod");
        let bucket = graph.of_type(stackwire_aws::Bucket::TYPE).next().unwrap();
        assert_eq!(
            bucket.property("bucket").and_then(stackwire_core::PropertyValue::as_str),
            Some("incoming")
        );
        assert!(bucket.urn.as_str().starts_with("urn:stackwire:prod::file-processor::"));
    }

    #[test]
    fn test_should_reject_unreadable_config_file() {
        let err = StackConfig::from_lookup(|key| {
            (key == "STACKWIRE_CONFIG_FILE").then(|| "/nonexistent/stack.json".to_owned())
        })
        .unwrap_err();
        assert!(matches!(err, StackError::InvalidConfig(_)));
    }
}
