//! The JSON document handed to the orchestration engine.

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use serde_json::Value;
    use stackwire_fileprocessor::FileProcessor;

    use crate::{declare, stack_config};

    /// URNs referenced anywhere inside `value` through `$ref` markers.
    fn referenced_urns(value: &Value, out: &mut BTreeSet<String>) {
        match value {
            Value::Object(map) => {
                if let Some(urn) = map.get("$ref").and_then(|r| r["urn"].as_str()) {
                    out.insert(urn.to_owned());
                }
                map.values().for_each(|v| referenced_urns(v, out));
            }
            Value::Array(items) => items.iter().for_each(|v| referenced_urns(v, out)),
            _ => {}
        }
    }

    fn document() -> Value {
        serde_json::to_value(declare(&stack_config("orders", "uploads", "processor"))).unwrap()
    }

    #[test]
    fn test_should_only_reference_earlier_resources() {
        let doc = document();
        let resources = doc["resources"].as_array().unwrap();
        let position: HashMap<&str, usize> = resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r["urn"].as_str().unwrap(), i))
            .collect();

        for (i, resource) in resources.iter().enumerate() {
            let mut deps = BTreeSet::new();
            referenced_urns(&resource["properties"], &mut deps);
            for explicit in resource["dependsOn"].as_array().unwrap() {
                deps.insert(explicit.as_str().unwrap().to_owned());
            }
            if let Some(parent) = resource["parent"].as_str() {
                deps.insert(parent.to_owned());
            }
            for dep in deps {
                assert!(
                    position[dep.as_str()] < i,
                    "{} references {dep} declared after it",
                    resource["urn"]
                );
            }
        }
    }

    #[test]
    fn test_should_qualify_child_urns_with_component_type() {
        let doc = document();
        let bucket = doc["resources"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["type"] == "aws:s3/bucket:Bucket")
            .unwrap();

        assert_eq!(
            bucket["urn"],
            format!(
                "urn:stackwire:dev::file-processor::{}$aws:s3/bucket:Bucket::sync-stream",
                FileProcessor::TYPE
            )
        );
        assert_eq!(bucket["custom"], true);
        assert_eq!(bucket["properties"]["bucket"], "uploads");
    }

    #[test]
    fn test_should_keep_bucket_policy_deferred() {
        let doc = document();
        let policy = doc["resources"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["name"] == "sync-stream-bucketPolicy")
            .unwrap();

        let segments = policy["properties"]["policy"]["$interpolate"].as_array().unwrap();
        let reference = segments
            .iter()
            .find_map(|s| s.get("$ref"))
            .expect("a deferred bucket id");
        assert_eq!(reference["property"], "id");
        assert!(reference["urn"].as_str().unwrap().ends_with("aws:s3/bucket:Bucket::sync-stream"));
    }

    #[test]
    fn test_should_publish_component_outputs() {
        let doc = document();
        let component = &doc["resources"][0];
        assert_eq!(component["type"], FileProcessor::TYPE);
        assert_eq!(component["custom"], false);

        let outputs = &doc["outputs"][component["urn"].as_str().unwrap()];
        for key in ["bucket", "lambda", "table"] {
            assert_eq!(outputs[key]["$ref"]["property"], "urn", "{key} output");
        }
        assert!(
            outputs["lambda"]["$ref"]["urn"]
                .as_str()
                .unwrap()
                .contains("aws:lambda/function:Function")
        );
    }
}
