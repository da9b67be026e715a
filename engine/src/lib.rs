//! # Graft Engine
//!
//! Maps typed application records onto the flat node representation of a
//! schema-less graph store, and works out which schema directives the
//! store is missing.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never talks to the store; callers hand it nodes
//!   and live schemas and send its output on
//! - **Deterministic**: type sets, lookup maps and nodes iterate in sorted
//!   order, so the same inputs always produce the same directives
//! - **Lossy encode, strict decode**: unmapped attributes are dropped on the
//!   way out; any attribute that fails to cast aborts the way back in
//!
//! ## Core Concepts
//!
//! ### Record types
//!
//! A record type is described by a [`SchemaProvider`]: its
//! [`FieldDescriptor`] table, the `source` discriminator written as a type
//! marker, the [`Directive`]s it needs, and the types it depends on.
//! Implementing [`Model`] for a struct derives all of that from one
//! [`TypeSchema`].
//!
//! ### Codec
//!
//! - [`encode`] turns a [`Record`] into a [`Node`]
//! - [`decode`] classifies a node by its `type.` marker through a
//!   [`TypeMap`] and rebuilds the typed record
//!
//! ### Schema
//!
//! - [`snapshot()`] lists the directives for a set of types and their
//!   direct dependencies
//! - [`delta`] subtracts the store's live schema from a snapshot
//!
//! ## Quick Start
//!
//! ```rust
//! use graft_engine::{
//!     build_lookup_map, decode, encode, provider, FieldDescriptor, FieldType, FromValue,
//!     Model, TypeMap, TypeSchema, Value,
//! };
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Person {
//!     uid: Option<String>,
//!     name: Option<String>,
//! }
//!
//! impl Model for Person {
//!     fn schema() -> TypeSchema {
//!         TypeSchema::new("person")
//!             .with_source("type.person")
//!             .with_field(FieldDescriptor::new("name", FieldType::String).with_predicate())
//!     }
//!
//!     fn values(&self) -> Vec<(&'static str, Value)> {
//!         vec![("uid", self.uid.clone().into()), ("name", self.name.clone().into())]
//!     }
//!
//!     fn assign(&mut self, field: &str, value: Value) -> Result<(), Value> {
//!         match field {
//!             "uid" => self.uid = FromValue::from_value(value)?,
//!             "name" => self.name = FromValue::from_value(value)?,
//!             _ => return Err(value),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let ann = Person { uid: Some("0x1".into()), name: Some("Ann".into()) };
//! let node = encode(&ann);
//! assert_eq!(node["type.person"], "true");
//!
//! let types = build_lookup_map(TypeMap::new(), &[provider::<Person>()]);
//! let decoded = decode(&node, &types).unwrap().unwrap();
//! assert_eq!(decoded.downcast::<Person>(), Some(ann));
//! ```

pub mod codec;
pub mod error;
pub mod lookup;
pub mod provider;
pub mod record;
pub mod schema;
pub mod snapshot;
pub mod value;


// Re-export main types at crate root
pub use codec::{
    decode, decode_strict, encode, encode_all, encode_value, is_identity_only, marker_key, Node,
    TYPE_PREFIX,
};
pub use error::{Error, Result};
pub use lookup::{build_lookup_map, TypeMap};
pub use provider::{provider, resolve_field, Model, Provider, SchemaProvider, TypeSchema, UID};
pub use record::Record;
pub use schema::{Directive, FieldDescriptor, FieldType};
pub use snapshot::{delta, directives, expand, snapshot};
pub use value::{FromValue, Geo, Value};
