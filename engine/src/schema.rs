//! Field descriptors and schema directives.
//!
//! A record type declares its attributes as a table of [`FieldDescriptor`]s.
//! Each descriptor may carry a [`Directive`] describing the store-side
//! predicate it needs; the snapshot collects those directives.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use std::fmt;

/// Logical field types a record attribute can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Edge to another node
    Uid,
    Boolean,
    Float,
    /// GeoJSON value
    Geo,
    Integer,
    Password,
    String,
    DateTime,
    /// Whatever the store returns, mapped structurally
    Auto,
}

impl FieldType {
    /// Scalar type name the store uses for a predicate of this type.
    pub fn store_type(&self) -> &'static str {
        match self {
            FieldType::Uid => "uid",
            FieldType::Boolean => "bool",
            FieldType::Float => "float",
            FieldType::Geo => "geo",
            FieldType::Integer => "int",
            FieldType::Password => "password",
            FieldType::String => "string",
            FieldType::DateTime => "datetime",
            FieldType::Auto => "default",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Uid => "uid",
            FieldType::Boolean => "boolean",
            FieldType::Float => "float",
            FieldType::Geo => "geo",
            FieldType::Integer => "integer",
            FieldType::Password => "password",
            FieldType::String => "string",
            FieldType::DateTime => "datetime",
            FieldType::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// An opaque schema alteration instruction.
///
/// Directives are compared structurally: two directives are equal iff their
/// full JSON content is equal, regardless of key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directive(JsonValue);

impl Directive {
    /// Wrap an arbitrary JSON description.
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// `{"predicate": name, "type": store_type}`
    pub fn predicate(name: impl Into<String>, store_type: impl Into<String>) -> Self {
        Self(json!({
            "predicate": name.into(),
            "type": store_type.into(),
        }))
    }

    /// Builder-style method to set one more key.
    ///
    /// Only object directives can be extended; others are returned as is.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        if let JsonValue::Object(map) = &mut self.0 {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Look up one key of an object directive.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// The predicate this directive alters, if it names one.
    pub fn predicate_name(&self) -> Option<&str> {
        self.get("predicate").and_then(JsonValue::as_str)
    }

    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }

    pub fn into_json(self) -> JsonValue {
        self.0
    }
}

impl From<JsonValue> for Directive {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declaration of one attribute of a record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Attribute name on the record
    pub name: String,
    /// Logical type values are cast to on decode
    pub field_type: FieldType,
    /// Key of the attribute in the node representation
    pub store_key: String,
    /// Schema directive this field needs in the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alter: Option<Directive>,
    /// Free-form options
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub opts: Map<String, JsonValue>,
}

impl FieldDescriptor {
    /// Create a field whose store key equals its name.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            store_key: name.clone(),
            name,
            field_type,
            alter: None,
            opts: Map::new(),
        }
    }

    pub fn with_store_key(mut self, store_key: impl Into<String>) -> Self {
        self.store_key = store_key.into();
        self
    }

    pub fn with_alter(mut self, directive: Directive) -> Self {
        self.alter = Some(directive);
        self
    }

    /// Declare the plain predicate for this field: its store key and the
    /// store type matching the field type.
    pub fn with_predicate(self) -> Self {
        let directive = Directive::predicate(&self.store_key, self.field_type.store_type());
        self.with_alter(directive)
    }

    /// Declare an indexed predicate using the given tokenizers.
    pub fn with_index(self, tokenizers: &[&str]) -> Self {
        let directive = self
            .alter
            .clone()
            .unwrap_or_else(|| Directive::predicate(&self.store_key, self.field_type.store_type()))
            .with("index", true)
            .with("tokenizer", tokenizers.to_vec());
        self.with_alter(directive)
    }

    pub fn with_opt(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.opts.insert(key.into(), value.into());
        self
    }
}
