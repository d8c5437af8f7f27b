//! Preview of the stack with synthesized provider values.

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use stackwire_aws::{
        Bucket, BucketNotification, Function, Permission, PreviewResolver, RolePolicy, Table,
    };
    use stackwire_core::{AccountId, AwsRegion};
    use stackwire_fileprocessor::FileProcessor;

    use crate::{declare, preview, previewed, stack_config};

    fn policy_text(document: &Value, name: &str) -> Value {
        let policy = &previewed(document, RolePolicy::TYPE, name)["properties"]["policy"];
        serde_json::from_str(policy.as_str().expect("resolved policy text")).unwrap()
    }

    #[test]
    fn test_should_substitute_bucket_name_into_policy() {
        let doc = preview(&declare(&stack_config("orders", "uploads", "processor")));
        let policy = policy_text(&doc, "sync-stream-bucketPolicy");

        assert_eq!(policy["Version"], "2012-10-17");
        assert_eq!(policy["Statement"][0]["Action"], serde_json::json!(["s3:GetObject"]));
        assert_eq!(
            policy["Statement"][0]["Resource"],
            serde_json::json!(["arn:aws:s3:::uploads/*"])
        );
    }

    #[test]
    fn test_should_change_only_bucket_and_policy_in_preview() {
        let before = preview(&declare(&stack_config("orders", "uploads", "processor")));
        let after = preview(&declare(&stack_config("orders", "incoming", "processor")));

        let mut changed: Vec<String> = before["resources"]
            .as_array()
            .unwrap()
            .iter()
            .zip(after["resources"].as_array().unwrap())
            .filter(|(a, b)| a["properties"] != b["properties"])
            .map(|(a, _)| {
                format!("{}/{}", a["type"].as_str().unwrap(), a["name"].as_str().unwrap())
            })
            .collect();
        changed.sort();

        // the permission and notification read the bucket's arn and id
        let mut expected = vec![
            format!("{}/sync-stream-bucketPolicy", RolePolicy::TYPE),
            format!("{}/sync-stream", Bucket::TYPE),
            format!("{}/sync-stream-permission", Permission::TYPE),
            format!("{}/sync-stream-objectCreated", BucketNotification::TYPE),
        ];
        expected.sort();
        assert_eq!(changed, expected);
    }

    #[test]
    fn test_should_wire_function_arn_into_notification() {
        let graph = declare(&stack_config("orders", "uploads", "processor"));
        let doc = PreviewResolver::new(
            &graph,
            AccountId::new("123456789012").unwrap(),
            AwsRegion::new("eu-west-1"),
        )
        .render()
        .unwrap();

        let notification = previewed(&doc, BucketNotification::TYPE, "sync-stream-objectCreated");
        let target = &notification["properties"]["lambdaFunctions"][0];
        assert_eq!(
            target["lambdaFunctionArn"],
            "arn:aws:lambda:eu-west-1:123456789012:function:sync-stream"
        );
        assert_eq!(target["events"], serde_json::json!(["s3:ObjectCreated:*"]));
        assert_eq!(notification["properties"]["bucket"], "uploads");

        let permission = previewed(&doc, Permission::TYPE, "sync-stream-permission");
        assert_eq!(permission["properties"]["sourceArn"], "arn:aws:s3:::uploads");
        assert_eq!(permission["properties"]["function"], "sync-stream");

        let function = previewed(&doc, Function::TYPE, "sync-stream");
        assert_eq!(
            function["properties"]["role"],
            "arn:aws:iam::123456789012:role/sync-stream"
        );
    }

    #[test]
    fn test_should_resolve_component_outputs_to_urns() {
        let graph = declare(&stack_config("orders", "uploads", "processor"));
        let doc = preview(&graph);
        let component = graph.of_type(FileProcessor::TYPE).next().unwrap();

        let outputs = &doc["outputs"][component.urn.as_str()];
        let table = graph.of_type(Table::TYPE).next().unwrap();
        assert_eq!(outputs["table"], table.urn.as_str());
    }
}
