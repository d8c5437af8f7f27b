//! Deferred values.
//!
//! A declaration frequently needs a value that only exists once another
//! resource has been provisioned (a bucket ARN inside a policy document, a
//! function ARN inside a notification). [`Output`] carries such values as
//! typed placeholders; the orchestration engine substitutes them after it
//! provisions the referenced resource. Every output knows which resources it
//! depends on, which the registry turns into dependency edges.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::types::Urn;

/// A property of a declared resource, resolved by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyRef {
    /// Referenced resource.
    pub urn: Urn,
    /// Property name on the referenced resource (e.g. `arn`).
    pub property: String,
}

impl PropertyRef {
    /// Create a new reference.
    #[must_use]
    pub fn new(urn: Urn, property: impl Into<String>) -> Self {
        Self {
            urn,
            property: property.into(),
        }
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.urn, self.property)
    }
}

/// One piece of an interpolated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text.
    Literal(String),
    /// Deferred text.
    Reference(PropertyRef),
}

/// A file archive packaged and uploaded by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileArchive {
    /// Path of the directory or archive, relative to the program.
    pub path: String,
}

/// A declared property value, possibly containing deferred parts.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(serde_json::Number),
    /// Known string.
    String(String),
    /// List of values.
    Array(Vec<PropertyValue>),
    /// Map of values, ordered by key.
    Object(BTreeMap<String, PropertyValue>),
    /// A property of another resource.
    Reference(PropertyRef),
    /// A string built from literal and deferred segments.
    Interpolation(Vec<Segment>),
    /// A code archive.
    Archive(FileArchive),
}

impl PropertyValue {
    /// Collect the URNs this value depends on.
    pub fn collect_dependencies(&self, deps: &mut BTreeSet<Urn>) {
        match self {
            Self::Reference(r) => {
                deps.insert(r.urn.clone());
            }
            Self::Interpolation(segments) => {
                for segment in segments {
                    if let Segment::Reference(r) = segment {
                        deps.insert(r.urn.clone());
                    }
                }
            }
            Self::Array(items) => items.iter().for_each(|v| v.collect_dependencies(deps)),
            Self::Object(map) => map.values().for_each(|v| v.collect_dependencies(deps)),
            Self::Bool(_) | Self::Number(_) | Self::String(_) | Self::Archive(_) => {}
        }
    }

    /// URNs this value depends on.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<Urn> {
        let mut deps = BTreeSet::new();
        self.collect_dependencies(&mut deps);
        deps
    }

    /// Whether the value is fully known at declaration time.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.dependencies().is_empty()
    }

    /// The value as a known string, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key of an object value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Encode the value for the declared document.
    ///
    /// Deferred parts use the `$ref`, `$interpolate` and `$archive` markers.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Reference(r) => json!({ "$ref": r }),
            Self::Interpolation(segments) => {
                let parts: Vec<Value> = segments
                    .iter()
                    .map(|segment| match segment {
                        Segment::Literal(s) => Value::String(s.clone()),
                        Segment::Reference(r) => json!({ "$ref": r }),
                    })
                    .collect();
                json!({ "$interpolate": parts })
            }
            Self::Archive(archive) => json!({ "$archive": archive }),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<FileArchive> for PropertyValue {
    fn from(value: FileArchive) -> Self {
        Self::Archive(value)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(value: Vec<PropertyValue>) -> Self {
        Self::Array(value)
    }
}

impl From<BTreeMap<String, PropertyValue>> for PropertyValue {
    fn from(value: BTreeMap<String, PropertyValue>) -> Self {
        Self::Object(value)
    }
}

impl<T> From<Output<T>> for PropertyValue {
    fn from(value: Output<T>) -> Self {
        value.value
    }
}

/// A typed, possibly deferred value.
pub struct Output<T> {
    value: PropertyValue,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Output<T> {
    /// Wrap a raw property value. The caller vouches for the type.
    #[must_use]
    pub fn from_property(value: PropertyValue) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// A value that is the `property` of the resource `urn`.
    #[must_use]
    pub fn reference(urn: Urn, property: impl Into<String>) -> Self {
        Self::from_property(PropertyValue::Reference(PropertyRef::new(urn, property)))
    }

    /// The underlying property value.
    #[must_use]
    pub fn as_property(&self) -> &PropertyValue {
        &self.value
    }

    /// Consume into the underlying property value.
    #[must_use]
    pub fn into_property(self) -> PropertyValue {
        self.value
    }

    /// URNs this output depends on.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<Urn> {
        self.value.dependencies()
    }

    /// Whether the value is known at declaration time.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.value.is_known()
    }
}

impl<T: Into<PropertyValue>> Output<T> {
    /// A value known at declaration time.
    #[must_use]
    pub fn known(value: impl Into<T>) -> Self {
        Self::from_property(value.into().into())
    }
}

impl Output<String> {
    /// The string, if known at declaration time.
    #[must_use]
    pub fn known_value(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Concatenate string outputs, keeping deferred parts deferred.
    ///
    /// Adjacent literals are merged; a result without references collapses to
    /// a known string.
    #[must_use]
    pub fn concat<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Output<String>>,
    {
        fn push_literal(segments: &mut Vec<Segment>, text: &str) {
            if text.is_empty() {
                return;
            }
            if let Some(Segment::Literal(last)) = segments.last_mut() {
                last.push_str(text);
            } else {
                segments.push(Segment::Literal(text.to_owned()));
            }
        }

        let mut segments: Vec<Segment> = Vec::new();

        for part in parts {
            match part.value {
                PropertyValue::String(s) => push_literal(&mut segments, &s),
                PropertyValue::Reference(r) => segments.push(Segment::Reference(r)),
                PropertyValue::Interpolation(inner) => {
                    for segment in inner {
                        match segment {
                            Segment::Literal(s) => push_literal(&mut segments, &s),
                            reference @ Segment::Reference(_) => segments.push(reference),
                        }
                    }
                }
                other => push_literal(&mut segments, &other.to_json().to_string()),
            }
        }

        let has_reference = segments
            .iter()
            .any(|s| matches!(s, Segment::Reference(_)));
        if has_reference {
            Self::from_property(PropertyValue::Interpolation(segments))
        } else {
            let text = segments
                .into_iter()
                .map(|s| match s {
                    Segment::Literal(text) => text,
                    Segment::Reference(_) => String::new(),
                })
                .collect::<String>();
            Self::known(text)
        }
    }
}

impl Output<FileArchive> {
    /// An archive of the file or directory at `path`.
    #[must_use]
    pub fn file_archive(path: impl Into<String>) -> Self {
        Self::from_property(PropertyValue::Archive(FileArchive { path: path.into() }))
    }
}

impl From<&str> for Output<String> {
    fn from(value: &str) -> Self {
        Self::known(value)
    }
}

impl From<String> for Output<String> {
    fn from(value: String) -> Self {
        Self::known(value)
    }
}

impl From<bool> for Output<bool> {
    fn from(value: bool) -> Self {
        Self::known(value)
    }
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self::from_property(self.value.clone())
    }
}

impl<T> PartialEq for Output<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Output").field(&self.value).finish()
    }
}
