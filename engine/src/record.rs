//! Typed records.
//!
//! A [`Record`] is an instance of some registered type. It exposes its
//! attributes by name so the codec can walk it without knowing the concrete
//! type; the type-level description lives in its [`Provider`].

use crate::{provider, Model, Provider, Value, UID};
use std::any::Any;
use std::fmt;

/// Object-safe view of a typed record.
///
/// Implemented for every [`Model`]; there is rarely a reason to implement
/// it by hand.
pub trait Record: Any + fmt::Debug + Send + Sync {
    /// The type this record is an instance of.
    fn provider(&self) -> Provider;

    /// Declared attributes in declaration order, `uid` included.
    /// Absent attributes are reported as [`Value::Null`].
    fn attributes(&self) -> Vec<(&'static str, Value)>;

    /// Set one attribute from a decoded value. The value is handed back if
    /// the attribute does not exist or cannot hold it.
    fn put(&mut self, field: &str, value: Value) -> Result<(), Value>;

    fn clone_record(&self) -> Box<dyn Record>;

    fn eq_record(&self, other: &dyn Record) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<M: Model> Record for M {
    fn provider(&self) -> Provider {
        provider::<M>()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        self.values()
    }

    fn put(&mut self, field: &str, value: Value) -> Result<(), Value> {
        self.assign(field, value)
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(self.clone())
    }

    fn eq_record(&self, other: &dyn Record) -> bool {
        other.as_any().downcast_ref::<M>() == Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn Record {
    pub fn is<M: Model>(&self) -> bool {
        self.as_any().is::<M>()
    }

    pub fn downcast_ref<M: Model>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }

    /// Recover the concrete record, or `None` if it is of another type.
    pub fn downcast<M: Model>(self: Box<Self>) -> Option<M> {
        self.into_any().downcast::<M>().ok().map(|model| *model)
    }

    /// The record's identity, when it has one.
    pub fn uid(&self) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|(name, _)| *name == UID)
            .and_then(|(_, value)| value.as_str().map(str::to_string))
    }
}

impl Clone for Box<dyn Record> {
    fn clone(&self) -> Self {
        self.clone_record()
    }
}

impl PartialEq for Box<dyn Record> {
    fn eq(&self, other: &Self) -> bool {
        self.eq_record(other.as_ref())
    }
}
