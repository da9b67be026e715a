//! Repository workflows: registering types, syncing the schema, and
//! writing and reading typed records through a store connection.

use std::collections::HashSet;
use std::sync::Arc;

use graft_engine::{decode, encode, Directive, Provider, Record, TypeMap, Value, UID};
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::error::{strict, RepoError, Result};
use crate::registry::{Registries, RegistryHandle};
use crate::store::{Connection, Params, Uids};
use crate::sync;

/// Prefix of node names the store replaces with assigned ids.
pub const BLANK_PREFIX: &str = "_:";

/// Result block of [`GET_BY_UID`].
pub const GET_BY_UID_BLOCK: &str = "get_by_uid";

/// Statement used by [`Repo::get`]; `$uid` is bound to the requested id.
pub const GET_BY_UID: &str = r#"query get_by_uid($uid: string) {
  get_by_uid(func: uid($uid)) {
    uid
    expand(_all_)
  }
}"#;

/// A named repository: a registry of types plus a store connection.
#[derive(Debug)]
pub struct Repo<C> {
    conn: Arc<C>,
    registry: RegistryHandle,
}

impl<C> Clone for Repo<C> {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            registry: self.registry.clone(),
        }
    }
}

impl<C: Connection> Repo<C> {
    /// A repository over an already running registry.
    pub fn new(conn: C, registry: RegistryHandle) -> Self {
        Self {
            conn: Arc::new(conn),
            registry,
        }
    }

    /// Attach to the registry named by `config` in `registries`, starting
    /// it if needed, register `providers`, and sync the schema if
    /// `alter_on_start` is set.
    ///
    /// Repositories started with the same name share one registry.
    pub async fn start(
        config: &Config,
        registries: &Registries,
        conn: C,
        providers: Vec<Provider>,
    ) -> Result<Self> {
        let registry = registries.get_or_start_with(&config.name, config.mailbox);
        let repo = Self::new(conn, registry);

        repo.register(providers).await?;
        if config.alter_on_start {
            repo.alter_schema().await?;
        }

        Ok(repo)
    }

    pub fn name(&self) -> &str {
        self.registry.name()
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    /// Add types to the registry. Returns how many were new.
    pub async fn register(&self, providers: Vec<Provider>) -> Result<usize> {
        self.registry.register(providers).await
    }

    pub async fn registered(&self) -> Result<Vec<Provider>> {
        self.registry.get().await
    }

    pub async fn lookup(&self) -> Result<TypeMap> {
        self.registry.lookup().await
    }

    pub async fn snapshot(&self) -> Result<Vec<Directive>> {
        sync::snapshot(&self.registry).await
    }

    /// Bring the store schema in line with the registered types.
    pub async fn alter_schema(&self) -> Result<usize> {
        let snapshot = self.snapshot().await?;
        let applied = sync::alter_schema(self.conn.as_ref(), &snapshot).await?;
        tracing::debug!(repo = %self.name(), applied, "Schema sync finished");
        Ok(applied)
    }

    pub async fn alter_schema_strict(&self) -> usize {
        strict(self.alter_schema().await)
    }

    /// Send a raw node (or list of nodes) to the store.
    pub async fn mutate(&self, data: &JsonValue) -> Result<Uids> {
        self.conn.mutate(data).await.map_err(|err| {
            tracing::warn!(repo = %self.name(), error = %err, "Mutation failed");
            RepoError::from(err)
        })
    }

    /// Write a record and return it with the ids the store assigned.
    pub async fn set<M: Record>(&self, mut record: M) -> Result<M> {
        self.set_record(&mut record).await?;
        Ok(record)
    }

    pub async fn set_strict<M: Record>(&self, record: M) -> M {
        strict(self.set(record).await)
    }

    /// Write a record in place.
    ///
    /// Every record in the tree that has no uid gets a blank node name so
    /// its type marker is written; after the mutation those names are
    /// replaced by the assigned ids, or cleared if the store assigned none.
    /// If the mutation fails the record is left as it was.
    pub async fn set_record(&self, record: &mut dyn Record) -> Result<Uids> {
        let named = name_blank_nodes(record);

        let node = encode(record);
        let uids = match self.mutate(&JsonValue::Object(node)).await {
            Ok(uids) => uids,
            Err(err) => {
                clear_blank_names(record, &named);
                return Err(err);
            }
        };
        assign_uids(record, &uids);

        tracing::debug!(repo = %self.name(), assigned = uids.len(), "Record written");
        Ok(uids)
    }

    /// Fetch the record with the given id. `None` if the store knows no
    /// such node.
    pub async fn get(&self, uid: &str) -> Result<Option<Box<dyn Record>>> {
        let params = Params::from([("$uid".to_string(), uid.to_string())]);
        let result = self.query(GET_BY_UID, &params).await?;

        let node = match result {
            JsonValue::Object(mut blocks) => blocks
                .remove(GET_BY_UID_BLOCK)
                .and_then(|block| block_nodes(block).into_iter().next()),
            _ => None,
        };
        let Some(node) = node else {
            return Ok(None);
        };

        let types = self.lookup().await?;
        decode_json(&node, &types)
    }

    pub async fn get_strict(&self, uid: &str) -> Option<Box<dyn Record>> {
        strict(self.get(uid).await)
    }

    /// Run a read statement and decode every node of every result block.
    /// Identity-only nodes are skipped.
    pub async fn all(&self, statement: &str, params: &Params) -> Result<Vec<Box<dyn Record>>> {
        let result = self.query(statement, params).await?;
        let types = self.lookup().await?;

        let blocks = match result {
            JsonValue::Object(blocks) => blocks,
            JsonValue::Null => return Ok(Vec::new()),
            other => return Err(graft_engine::Error::Untyped { node: other }.into()),
        };

        let mut records = Vec::new();
        for (_, block) in blocks {
            for node in &block_nodes(block) {
                if let Some(record) = decode_json(node, &types)? {
                    records.push(record);
                }
            }
        }

        Ok(records)
    }

    pub async fn all_strict(&self, statement: &str, params: &Params) -> Vec<Box<dyn Record>> {
        strict(self.all(statement, params).await)
    }

    async fn query(&self, statement: &str, params: &Params) -> Result<JsonValue> {
        self.conn.query(statement, params).await.map_err(|err| {
            tracing::warn!(repo = %self.name(), error = %err, "Query failed");
            RepoError::from(err)
        })
    }
}

/// Nodes of a result block. A block holding a single node instead of a
/// list is read as that node; a null block holds nothing.
fn block_nodes(block: JsonValue) -> Vec<JsonValue> {
    match block {
        JsonValue::Array(nodes) => nodes,
        JsonValue::Null => Vec::new(),
        single => vec![single],
    }
}

fn decode_json(node: &JsonValue, types: &TypeMap) -> Result<Option<Box<dyn Record>>> {
    match node {
        JsonValue::Object(node) => Ok(decode(node, types)?),
        other => Err(graft_engine::Error::Untyped { node: other.clone() }.into()),
    }
}

/// Give every record without a uid a fresh blank node name. Returns the
/// names handed out.
fn name_blank_nodes(record: &mut dyn Record) -> HashSet<String> {
    let mut named = HashSet::new();
    rewrite(record, &mut |uid| match uid {
        None => {
            let blank = format!("{}{}", BLANK_PREFIX, uuid::Uuid::new_v4().simple());
            named.insert(blank.clone());
            Some(blank)
        }
        Some(uid) => Some(uid),
    });
    named
}

/// Undo [`name_blank_nodes`]: uids in `named` go back to `None`.
fn clear_blank_names(record: &mut dyn Record, named: &HashSet<String>) {
    rewrite(record, &mut |uid| uid.filter(|uid| !named.contains(uid)));
}

/// Replace blank node names with the ids assigned to them.
fn assign_uids(record: &mut dyn Record, uids: &Uids) {
    rewrite(record, &mut |uid| match uid {
        Some(uid) => match uid.strip_prefix(BLANK_PREFIX) {
            Some(blank) => uids.get(blank).cloned(),
            None => Some(uid),
        },
        None => None,
    });
}

/// Walk the record tree, replacing each record's uid with `update(uid)`.
fn rewrite(record: &mut dyn Record, update: &mut dyn FnMut(Option<String>) -> Option<String>) {
    for (field, value) in record.attributes() {
        let rewritten = if field == UID {
            let uid = value.as_str().map(str::to_string);
            match update(uid) {
                Some(uid) => Value::String(uid),
                None => Value::Null,
            }
        } else {
            match rewrite_value(value, update) {
                Some(value) => value,
                None => continue,
            }
        };

        // the value came from the record itself, so it fits
        let _ = record.put(field, rewritten);
    }
}

fn rewrite_value(
    value: Value,
    update: &mut dyn FnMut(Option<String>) -> Option<String>,
) -> Option<Value> {
    match value {
        Value::Record(mut nested) => {
            rewrite(nested.as_mut(), update);
            Some(Value::Record(nested))
        }
        Value::List(items) if items.iter().any(|item| matches!(item, Value::Record(_))) => {
            let items = items
                .into_iter()
                .map(|item| match item {
                    Value::Record(mut nested) => {
                        rewrite(nested.as_mut(), update);
                        Value::Record(nested)
                    }
                    other => other,
                })
                .collect();
            Some(Value::List(items))
        }
        _ => None,
    }
}
