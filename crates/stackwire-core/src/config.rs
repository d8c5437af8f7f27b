//! Stack configuration.
//!
//! Configuration is driven by environment variables. Values come from an
//! optional JSON file and an optional inline JSON object, the latter taking
//! precedence. Keys are looked up namespaced by project first
//! (`file-processor:table`), then bare (`table`).
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STACKWIRE_PROJECT` | `file-processor` | Project name |
//! | `STACKWIRE_STACK` | `dev` | Stack name |
//! | `STACKWIRE_CONFIG_FILE` | *(unset)* | Path of a JSON file `{"config": {...}}` |
//! | `STACKWIRE_CONFIG` | *(unset)* | Inline JSON object of values |

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{StackError, StackResult};

/// Configuration values of one stack.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackConfig {
    /// Project name.
    pub project: String,
    /// Stack name.
    pub stack: String,
    /// Raw values, keyed as written in the source.
    pub values: BTreeMap<String, String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROJECT, Self::DEFAULT_STACK)
    }
}

impl StackConfig {
    /// Project used when `STACKWIRE_PROJECT` is unset.
    pub const DEFAULT_PROJECT: &str = "file-processor";
    /// Stack used when `STACKWIRE_STACK` is unset.
    pub const DEFAULT_STACK: &str = "dev";

    /// Empty configuration for `project` / `stack`.
    #[must_use]
    pub fn new(project: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            stack: stack.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set a value.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> StackResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StackResult<Self> {
        let mut config = Self::new(
            lookup("STACKWIRE_PROJECT").unwrap_or_else(|| Self::DEFAULT_PROJECT.to_owned()),
            lookup("STACKWIRE_STACK").unwrap_or_else(|| Self::DEFAULT_STACK.to_owned()),
        );

        if let Some(path) = lookup("STACKWIRE_CONFIG_FILE") {
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                StackError::InvalidConfig(format!("cannot read config file {path}: {e}"))
            })?;
            config.merge_json(&path, &raw)?;
        }
        if let Some(raw) = lookup("STACKWIRE_CONFIG") {
            config.merge_json("STACKWIRE_CONFIG", &raw)?;
        }

        debug!(
            project = %config.project,
            stack = %config.stack,
            keys = ?config.values.keys().collect::<Vec<_>>(),
            "loaded stack configuration",
        );
        Ok(config)
    }

    /// Merge values from a JSON document.
    ///
    /// Accepts either `{"config": {...}}` or a flat object. Strings are taken
    /// as-is; numbers and booleans are stored in their JSON text form.
    pub fn merge_json(&mut self, source: &str, raw: &str) -> StackResult<()> {
        let doc: Value = serde_json::from_str(raw)
            .map_err(|e| StackError::InvalidConfig(format!("{source}: {e}")))?;
        let map = match doc {
            Value::Object(mut root) => match root.remove("config") {
                Some(Value::Object(inner)) => inner,
                Some(other) => {
                    root.insert("config".to_owned(), other);
                    root
                }
                None => root,
            },
            _ => {
                return Err(StackError::InvalidConfig(format!(
                    "{source}: expected a JSON object"
                )));
            }
        };

        for (key, value) in map {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(StackError::InvalidConfig(format!(
                        "{source}: value of `{key}` must be a scalar, got {other}"
                    )));
                }
            };
            self.values.insert(key, text);
        }
        Ok(())
    }

    /// Look up a value, namespaced key first.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&format!("{}:{key}", self.project))
            .or_else(|| self.values.get(key))
            .map(String::as_str)
    }

    /// Look up several required values, reporting every missing key at once.
    pub fn require_all<const N: usize>(&self, keys: [&str; N]) -> StackResult<[&str; N]> {
        let missing: Vec<String> = keys
            .iter()
            .filter(|key| self.get(key).is_none())
            .map(|key| (*key).to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(StackError::MissingConfig(missing));
        }
        Ok(keys.map(|key| self.get(key).unwrap_or_default()))
    }
}
