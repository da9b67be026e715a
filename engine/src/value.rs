//! Attribute values carried by typed records.

use crate::{Model, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GeoJSON geometry, as the store returns it for `geo` predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: serde_json::Value,
}

impl Geo {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: serde_json::json!([longitude, latitude]),
        }
    }
}

/// The value of one record attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent; dropped on encode
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Reference to another node by id only
    Uid(String),
    DateTime(DateTime<Utc>),
    Geo(Geo),
    /// Untyped structured data
    Json(serde_json::Value),
    /// Nested typed record
    Record(Box<dyn Record>),
    List(Vec<Value>),
}

impl Value {
    /// Wrap a typed record.
    pub fn record<M: Model>(model: M) -> Self {
        Value::Record(Box::new(model))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Uid(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to an optional typed record.
    ///
    /// A bare [`Value::Uid`] becomes a default record carrying only that uid.
    pub fn into_model<M: Model>(self) -> std::result::Result<Option<M>, Value> {
        match self {
            Value::Null => Ok(None),
            Value::Record(record) => {
                if record.is::<M>() {
                    Ok(record.downcast::<M>())
                } else {
                    Err(Value::Record(record))
                }
            }
            Value::Uid(uid) => {
                let mut model = M::default();
                model.assign(crate::UID, Value::String(uid))?;
                Ok(Some(model))
            }
            other => Err(other),
        }
    }

    /// Convert to a list of typed records. A single record becomes a
    /// one-element list.
    pub fn into_models<M: Model>(self) -> std::result::Result<Vec<M>, Value> {
        match self {
            Value::List(items) => {
                let mut models = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(model) = item.into_model()? {
                        models.push(model);
                    }
                }
                Ok(models)
            }
            other => Ok(other.into_model()?.into_iter().collect()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Geo> for Value {
    fn from(value: Geo) -> Self {
        Value::Geo(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// Conversion from a decoded [`Value`] back into a record attribute.
///
/// On mismatch the value is handed back so the caller can report it.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> std::result::Result<Self, Value>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(other),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(other),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::String(s) | Value::Uid(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => Err(other),
        }
    }
}

impl FromValue for Geo {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Geo(geo) => Ok(geo),
            other => Err(other),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Json(json) => Ok(json),
            other => Err(other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other),
        }
    }
}
