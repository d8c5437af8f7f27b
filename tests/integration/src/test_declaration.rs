//! Shape of the declared graph.

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use stackwire_aws::{
        Bucket, BucketNotification, Function, Permission, Role, RolePolicy, Table,
    };
    use stackwire_core::PropertyValue;
    use stackwire_fileprocessor::{COMPONENT_NAME, FileProcessor};

    use crate::{declare, named, single, stack_config};

    fn known_json(value: Option<&PropertyValue>) -> Value {
        let text = value.and_then(PropertyValue::as_str).expect("known string");
        serde_json::from_str(text).expect("valid json")
    }

    /// Varied input triples: plain names, dotted bucket and table names, a
    /// bucket name the provider would reject, and a `function` value equal
    /// to the component name.
    const TRIPLES: [(&str, &str, &str); 4] = [
        ("orders", "uploads", "processor"),
        ("events.v2", "logs.example.com", "ingest"),
        ("t", "Legacy_Uploads", "x"),
        ("sync-stream", "sync-stream", COMPONENT_NAME),
    ];

    #[test]
    fn test_should_declare_each_resource_once() {
        for (table, bucket, function) in TRIPLES {
            let graph = declare(&stack_config(table, bucket, function));

            assert_eq!(graph.len(), 10, "{table}/{bucket}/{function}");
            for resource_type in [
                FileProcessor::TYPE,
                Bucket::TYPE,
                Role::TYPE,
                Function::TYPE,
                Permission::TYPE,
                BucketNotification::TYPE,
                Table::TYPE,
            ] {
                assert_eq!(single(&graph, resource_type).resource_type, resource_type);
            }
            assert_eq!(graph.of_type(RolePolicy::TYPE).count(), 3);

            let declared = single(&graph, Bucket::TYPE);
            assert_eq!(declared.property("bucket").and_then(PropertyValue::as_str), Some(bucket));
            let declared = single(&graph, Table::TYPE);
            assert_eq!(declared.property("name").and_then(PropertyValue::as_str), Some(table));
            assert_eq!(declared.property("hashKey").and_then(PropertyValue::as_str), Some("Key"));
            let declared = single(&graph, Function::TYPE);
            assert_eq!(
                declared.property("name").and_then(PropertyValue::as_str),
                Some(COMPONENT_NAME)
            );
        }
    }

    #[test]
    fn test_should_declare_bucket_name_as_given() {
        let graph = stackwire_fileprocessor::declare(&stack_config(
            "orders",
            "Legacy_Uploads",
            "processor",
        ))
        .unwrap();

        assert_eq!(graph.len(), 10);
        let bucket = single(&graph, Bucket::TYPE);
        assert_eq!(
            bucket.property("bucket").and_then(PropertyValue::as_str),
            Some("Legacy_Uploads")
        );
    }

    #[test]
    fn test_should_trust_only_lambda_service() {
        let graph = declare(&stack_config("orders", "uploads", "processor"));
        let role = single(&graph, Role::TYPE);
        let policy = known_json(role.property("assumeRolePolicy"));

        let statements = policy["Statement"].as_array().unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0]["Effect"], "Allow");
        assert_eq!(statements[0]["Action"], serde_json::json!(["sts:AssumeRole"]));
        assert_eq!(
            statements[0]["Principal"],
            serde_json::json!({"Service": "lambda.amazonaws.com"})
        );
    }

    #[test]
    fn test_should_declare_single_key_streaming_table() {
        let graph = declare(&stack_config("orders", "uploads", "processor"));
        let table = serde_json::to_value(&single(&graph, Table::TYPE).properties).unwrap();

        assert_eq!(table["name"], "orders");
        assert_eq!(table["attributes"], serde_json::json!([{"name": "Key", "type": "S"}]));
        assert_eq!(table["hashKey"], "Key");
        assert_eq!(table["billingMode"], "PAY_PER_REQUEST");
        assert_eq!(table["streamEnabled"], true);
        assert_eq!(table["streamViewType"], "NEW_IMAGE");
    }

    #[test]
    fn test_should_wire_configured_names() {
        let graph = declare(&stack_config("orders", "uploads", "processor"));

        let bucket = single(&graph, Bucket::TYPE);
        assert_eq!(bucket.property("bucket").and_then(PropertyValue::as_str), Some("uploads"));

        let function = single(&graph, Function::TYPE);
        let table_name = function
            .property("environment")
            .and_then(|env| env.get("variables"))
            .and_then(|vars| vars.get("TABLE_NAME"))
            .and_then(PropertyValue::as_str);
        assert_eq!(table_name, Some("orders"));
        assert_eq!(function.property("name").and_then(PropertyValue::as_str), Some(COMPONENT_NAME));
        assert_eq!(function.property("handler").and_then(PropertyValue::as_str), Some("index.handler"));
        assert_eq!(function.property("runtime").and_then(PropertyValue::as_str), Some("nodejs16.x"));
    }

    #[test]
    fn test_should_attach_policies_to_role() {
        let graph = declare(&stack_config("orders", "uploads", "processor"));
        let role = single(&graph, Role::TYPE);

        for suffix in ["bucketPolicy", "dynamoPolicy", "logPolicy"] {
            let policy = named(&graph, RolePolicy::TYPE, &format!("{COMPONENT_NAME}-{suffix}"));
            let deps = &policy.property_dependencies["role"];
            assert!(deps.contains(&role.urn), "{suffix} should reference the role");
        }

        let dynamo = known_json(
            named(&graph, RolePolicy::TYPE, "sync-stream-dynamoPolicy").property("policy"),
        );
        assert_eq!(dynamo["Statement"][0]["Action"], serde_json::json!(["dynamodb:PutItem"]));
        assert_eq!(dynamo["Statement"][0]["Resource"], serde_json::json!(["*"]));
    }

    #[test]
    fn test_should_declare_role_and_policies_before_function() {
        let graph = declare(&stack_config("orders", "uploads", "processor"));
        let function = graph.position(&single(&graph, Function::TYPE).urn).unwrap();

        assert!(graph.position(&single(&graph, Role::TYPE).urn).unwrap() < function);
        for policy in graph.of_type(RolePolicy::TYPE) {
            assert!(graph.position(&policy.urn).unwrap() < function);
        }
    }

    #[test]
    fn test_should_keep_explicit_ordering_hints() {
        let graph = declare(&stack_config("orders", "uploads", "processor"));
        let bucket = single(&graph, Bucket::TYPE);
        let function = single(&graph, Function::TYPE);
        let permission = single(&graph, Permission::TYPE);
        let notification = single(&graph, BucketNotification::TYPE);

        assert_eq!(function.depends_on, [bucket.urn.clone()]);
        assert_eq!(notification.depends_on, [permission.urn.clone()]);
    }

    #[test]
    fn test_should_grant_s3_invocation_from_bucket_only() {
        let graph = declare(&stack_config("orders", "uploads", "processor"));
        let permission = single(&graph, Permission::TYPE);
        let bucket = single(&graph, Bucket::TYPE);

        assert_eq!(permission.name, "sync-stream-permission");
        assert_eq!(
            permission.property("action").and_then(PropertyValue::as_str),
            Some("lambda:InvokeFunction")
        );
        assert_eq!(
            permission.property("principal").and_then(PropertyValue::as_str),
            Some("s3.amazonaws.com")
        );
        assert!(permission.property_dependencies["sourceArn"].contains(&bucket.urn));
    }

    #[test]
    fn test_should_only_touch_bucket_and_its_policy_when_bucket_changes() {
        let before = declare(&stack_config("orders", "uploads", "processor"));
        let after = declare(&stack_config("orders", "incoming", "processor"));

        let changed: Vec<&str> = before
            .iter()
            .zip(after.iter())
            .filter(|(a, b)| {
                assert_eq!(a.urn, b.urn);
                serde_json::to_value(&a.properties).unwrap()
                    != serde_json::to_value(&b.properties).unwrap()
            })
            .map(|(a, _)| a.name.as_str())
            .collect();

        assert_eq!(changed, [COMPONENT_NAME]);
        assert_eq!(
            single(&after, Bucket::TYPE).property("bucket").and_then(PropertyValue::as_str),
            Some("incoming")
        );
    }
}
