//! DynamoDB tables.
//!
//! Enum variants use idiomatic Rust `PascalCase` naming and map to the
//! `SCREAMING_SNAKE_CASE` strings the DynamoDB API uses through `as_str`.

use std::collections::BTreeMap;

use serde::Serialize;
use stackwire_core::{
    Output, Properties, PropertyValue, Resource, ResourceOptions, StackContext, StackResult, Urn,
};

use crate::validation::ValidationError;

/// Scalar attribute types allowed in key schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarAttributeType {
    /// String type.
    S,
    /// Number type.
    N,
    /// Binary type.
    B,
}

impl ScalarAttributeType {
    /// Returns the DynamoDB wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
        }
    }
}

impl std::fmt::Display for ScalarAttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ScalarAttributeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Billing mode for a DynamoDB table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BillingMode {
    /// Provisioned capacity mode with explicit RCU/WCU settings.
    Provisioned,
    /// On-demand capacity mode (pay per request).
    #[default]
    PayPerRequest,
}

impl BillingMode {
    /// Returns the DynamoDB wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provisioned => "PROVISIONED",
            Self::PayPerRequest => "PAY_PER_REQUEST",
        }
    }
}

impl std::fmt::Display for BillingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BillingMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// What a change stream record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamViewType {
    /// Only the key attributes of the modified item.
    KeysOnly,
    /// The entire item as it appears after modification.
    NewImage,
    /// The entire item as it appeared before modification.
    OldImage,
    /// Both the new and old item images.
    NewAndOldImages,
}

impl StreamViewType {
    /// Returns the DynamoDB wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeysOnly => "KEYS_ONLY",
            Self::NewImage => "NEW_IMAGE",
            Self::OldImage => "OLD_IMAGE",
            Self::NewAndOldImages => "NEW_AND_OLD_IMAGES",
        }
    }
}

impl std::fmt::Display for StreamViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StreamViewType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An attribute definition used by the key schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute type.
    pub attribute_type: ScalarAttributeType,
}

impl TableAttribute {
    /// A string attribute.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: ScalarAttributeType::S,
        }
    }
}

/// Arguments of a [`Table`].
#[derive(Debug, Clone)]
pub struct TableArgs {
    /// Physical table name.
    pub name: Option<Output<String>>,
    /// Key attribute definitions.
    pub attributes: Vec<TableAttribute>,
    /// Partition key attribute.
    pub hash_key: String,
    /// Capacity mode.
    pub billing_mode: BillingMode,
    /// Whether the change stream is on.
    pub stream_enabled: bool,
    /// Stream record content; required when the stream is on.
    pub stream_view_type: Option<StreamViewType>,
}

impl TableArgs {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.attributes.is_empty() {
            return Err(ValidationError::new(
                "attributes",
                "at least one attribute is required",
            ));
        }
        if !self.attributes.iter().any(|a| a.name == self.hash_key) {
            return Err(ValidationError::new(
                "hashKey",
                format!("{:?} is not a declared attribute", self.hash_key),
            ));
        }
        if self.stream_enabled && self.stream_view_type.is_none() {
            return Err(ValidationError::new(
                "streamViewType",
                "a stream view type is required when the stream is enabled",
            ));
        }
        Ok(())
    }
}

/// A DynamoDB table.
#[derive(Debug, Clone)]
pub struct Table {
    urn: Urn,
}

impl Table {
    /// Type token.
    pub const TYPE: &str = "aws:dynamodb/table:Table";

    /// Declare a table.
    pub fn new(
        ctx: &mut StackContext,
        name: &str,
        args: TableArgs,
        opts: &ResourceOptions,
    ) -> StackResult<Self> {
        args.validate().map_err(|e| e.for_resource(name))?;

        let attributes = args
            .attributes
            .into_iter()
            .map(|attr| {
                let mut obj = BTreeMap::new();
                obj.insert("name".to_owned(), PropertyValue::from(attr.name));
                obj.insert("type".to_owned(), attr.attribute_type.as_str().into());
                PropertyValue::Object(obj)
            })
            .collect();

        let mut props = Properties::new();
        if let Some(table_name) = args.name {
            props.insert("name".to_owned(), table_name.into());
        }
        props.insert("attributes".to_owned(), PropertyValue::Array(attributes));
        props.insert("hashKey".to_owned(), args.hash_key.into());
        props.insert("billingMode".to_owned(), args.billing_mode.as_str().into());
        props.insert("streamEnabled".to_owned(), args.stream_enabled.into());
        if let Some(view) = args.stream_view_type {
            props.insert("streamViewType".to_owned(), view.as_str().into());
        }

        let urn = ctx.register_resource(Self::TYPE, name, props, opts)?;
        Ok(Self { urn })
    }

    /// Provider id (the table name).
    #[must_use]
    pub fn id(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "id")
    }

    /// Table ARN.
    #[must_use]
    pub fn arn(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "arn")
    }

    /// Physical table name.
    #[must_use]
    pub fn name(&self) -> Output<String> {
        Output::reference(self.urn.clone(), "name")
    }
}

impl Resource for Table {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}
