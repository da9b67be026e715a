//! Encoding typed records to store nodes and decoding them back.
//!
//! A node is a flat string-keyed JSON object. Encoding writes each mapped
//! attribute under its store key, plus a type marker `type.<source> -> "true"`
//! next to the identity so the node can be classified when it is read back.
//! Decoding finds that marker, resolves the registered type and casts every
//! known key to its declared field type.

use crate::{
    error::Result, resolve_field, Error, FieldType, Geo, Record, TypeMap, Value, UID,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value as JsonValue};

/// The store-side representation of one entity.
pub type Node = serde_json::Map<String, JsonValue>;

/// Prefix every type marker key carries.
pub const TYPE_PREFIX: &str = "type.";

const MARKER: &str = "true";

/// The marker key written for `source`: the source itself when it already
/// carries [`TYPE_PREFIX`], otherwise the source with the prefix added.
pub fn marker_key(source: &str) -> String {
    if source.starts_with(TYPE_PREFIX) {
        source.to_string()
    } else {
        format!("{TYPE_PREFIX}{source}")
    }
}

/// Encode one record into a node.
///
/// Null attributes are dropped, and so are attributes whose value has no
/// JSON form (NaN, infinities). Attributes without a store key in the
/// record's field table are dropped as well; encoding never fails.
pub fn encode(record: &dyn Record) -> Node {
    let provider = record.provider();
    let mut node = Node::new();

    for (name, value) in record.attributes() {
        if value.is_null() {
            continue;
        }

        if name == UID {
            node.insert(UID.to_string(), encode_value(&value));
            if let Some(source) = provider.source() {
                node.insert(marker_key(source), JsonValue::String(MARKER.to_string()));
            }
            continue;
        }

        if let Some(store_key) = provider.store_key(name) {
            let encoded = encode_value(&value);
            if !encoded.is_null() {
                node.insert(store_key.to_string(), encoded);
            }
        }
    }

    node
}

/// Encode a list of records, preserving order.
pub fn encode_all<R: Record>(records: &[R]) -> Vec<Node> {
    records.iter().map(|record| encode(record)).collect()
}

/// Encode a single attribute value.
///
/// Records become nested nodes, lists are encoded element-wise, scalars pass
/// through as their JSON form.
pub fn encode_value(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        // NaN and infinities have no JSON form
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Uid(uid) => json!({ UID: uid }),
        Value::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
        Value::Geo(geo) => json!({
            "type": geo.kind,
            "coordinates": geo.coordinates,
        }),
        Value::Json(json) => json.clone(),
        Value::Record(record) => JsonValue::Object(encode(record.as_ref())),
        Value::List(items) => items.iter().map(encode_value).collect(),
    }
}

/// Decode a node into the registered type its marker names.
///
/// Returns `Ok(None)` for a node holding nothing but its identity, which is
/// how the store answers a lookup of a missing id. Fails with
/// [`Error::Untyped`] when no registered type matches, and with the first
/// [`Error::Cast`] met while converting attributes.
pub fn decode(node: &Node, types: &TypeMap) -> Result<Option<Box<dyn Record>>> {
    if is_identity_only(node) {
        return Ok(None);
    }
    decode_record(node, types).map(Some)
}

/// Like [`decode`], for callers that treat any failure as fatal.
///
/// # Panics
///
/// Panics with the decode error.
pub fn decode_strict(node: &Node, types: &TypeMap) -> Option<Box<dyn Record>> {
    match decode(node, types) {
        Ok(record) => record,
        Err(err) => panic!("{err}"),
    }
}

/// `true` for a node whose only key is the identity.
pub fn is_identity_only(node: &Node) -> bool {
    node.len() == 1 && node.contains_key(UID)
}

fn decode_record(node: &Node, types: &TypeMap) -> Result<Box<dyn Record>> {
    let (marker, _) = node
        .iter()
        .find(|(key, _)| key.starts_with(TYPE_PREFIX))
        .ok_or_else(|| Error::untyped(node))?;
    let provider = types.get(marker).ok_or_else(|| Error::untyped(node))?;

    let mut record = provider.instantiate();
    for (key, raw) in node {
        let Some((field, field_type)) = resolve_field(provider.as_ref(), key) else {
            continue;
        };

        let value = cast(field, field_type, raw, types)?;
        record
            .put(field, value)
            .map_err(|_| cast_error(field, field_type, raw))?;
    }

    Ok(record)
}

/// Convert a raw store value to the declared field type.
fn cast(field: &str, field_type: FieldType, raw: &JsonValue, types: &TypeMap) -> Result<Value> {
    let fail = || cast_error(field, field_type, raw);

    match (field_type, raw) {
        (_, JsonValue::Null) => Ok(Value::Null),
        (_, JsonValue::Array(items)) => items
            .iter()
            .map(|item| cast(field, field_type, item, types))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),

        (FieldType::String | FieldType::Password, JsonValue::String(s)) => {
            Ok(Value::String(s.clone()))
        }

        (FieldType::Integer, JsonValue::Number(n)) => n.as_i64().map(Value::Int).ok_or_else(fail),
        (FieldType::Integer, JsonValue::String(s)) => {
            s.parse::<i64>().map(Value::Int).map_err(|_| fail())
        }

        (FieldType::Float, JsonValue::Number(n)) => n.as_f64().map(Value::Float).ok_or_else(fail),
        (FieldType::Float, JsonValue::String(s)) => {
            s.parse::<f64>().map(Value::Float).map_err(|_| fail())
        }

        (FieldType::Boolean, JsonValue::Bool(b)) => Ok(Value::Bool(*b)),
        (FieldType::Boolean, JsonValue::String(s)) => match s.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(fail()),
        },

        (FieldType::DateTime, JsonValue::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
            .map_err(|_| fail()),

        (FieldType::Geo, JsonValue::Object(_)) => serde_json::from_value::<Geo>(raw.clone())
            .map(Value::Geo)
            .map_err(|_| fail()),

        (FieldType::Uid, JsonValue::String(uid)) => Ok(Value::Uid(uid.clone())),
        (FieldType::Uid, JsonValue::Object(node)) => match node.get(UID) {
            Some(JsonValue::String(uid)) if is_identity_only(node) => Ok(Value::Uid(uid.clone())),
            _ => decode_record(node, types).map(Value::Record),
        },

        (FieldType::Auto, raw) => Ok(auto(raw)),

        _ => Err(fail()),
    }
}

fn auto(raw: &JsonValue) -> Value {
    match raw {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::Float))
            .unwrap_or_else(|| Value::Json(raw.clone())),
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::List(items.iter().map(auto).collect()),
        JsonValue::Object(_) => Value::Json(raw.clone()),
    }
}

fn cast_error(field: &str, field_type: FieldType, raw: &JsonValue) -> Error {
    Error::Cast {
        field: field.to_string(),
        field_type,
        value: raw.clone(),
    }
}
