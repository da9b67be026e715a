//! Error types for the graft engine.

use crate::FieldType;
use thiserror::Error;

/// All possible errors from the graft engine.
///
/// Encoding never fails, so every variant here comes out of decoding.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The node carries no type marker, or a marker no registered type owns.
    #[error("untyped node: {node}")]
    Untyped { node: serde_json::Value },

    /// A raw store value could not be converted to the field's declared type.
    #[error("cannot cast field '{field}' to {field_type}: {value}")]
    Cast {
        field: String,
        field_type: FieldType,
        value: serde_json::Value,
    },
}

impl Error {
    pub(crate) fn untyped(node: &crate::Node) -> Self {
        Error::Untyped {
            node: serde_json::Value::Object(node.clone()),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
