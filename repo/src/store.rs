//! Contract of the store connection the repository talks through.
//!
//! The repository never speaks the wire protocol itself. Any client that can
//! mutate, query, read the schema and alter it implements [`Connection`];
//! timeouts, retries and pooling are its business.

use async_trait::async_trait;
use graft_engine::Directive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ids assigned by a mutation, keyed by blank node name without the `_:`
/// prefix.
pub type Uids = BTreeMap<String, String>;

/// Query variables, e.g. `$uid`.
pub type Params = BTreeMap<String, String>;

/// Schema as the store reports it and accepts it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaPayload {
    pub schema: Vec<Directive>,
}

impl SchemaPayload {
    pub fn new(schema: Vec<Directive>) -> Self {
        Self { schema }
    }
}

/// Failure reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct StoreError {
    /// Store-specific error code, when there is one
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A handle to the graph store.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Write a node, or a list of nodes.
    async fn mutate(&self, data: &serde_json::Value) -> Result<Uids, StoreError>;

    /// Run a read statement; the result maps block names to node lists.
    async fn query(&self, statement: &str, params: &Params) -> Result<serde_json::Value, StoreError>;

    /// The schema the store currently reports.
    async fn query_schema(&self) -> Result<SchemaPayload, StoreError>;

    /// Apply schema directives.
    async fn alter(&self, schema: &SchemaPayload) -> Result<(), StoreError>;
}
