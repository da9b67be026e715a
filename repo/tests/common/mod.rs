//! Shared fixtures: record models and an in-memory store.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use graft_engine::{Directive, FieldDescriptor, FieldType, FromValue, Model, TypeSchema, Value};
use graft_repo::{Connection, Params, SchemaPayload, StoreError, Uids};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub uid: Option<String>,
    pub name: Option<String>,
}

impl Model for Person {
    fn schema() -> TypeSchema {
        TypeSchema::new("person")
            .with_source("person")
            .with_field(FieldDescriptor::new("name", FieldType::String).with_predicate())
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("uid", self.uid.clone().into()),
            ("name", self.name.clone().into()),
        ]
    }

    fn assign(&mut self, field: &str, value: Value) -> Result<(), Value> {
        match field {
            "uid" => self.uid = FromValue::from_value(value)?,
            "name" => self.name = FromValue::from_value(value)?,
            _ => return Err(value),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pet {
    pub uid: Option<String>,
    pub name: Option<String>,
}

impl Model for Pet {
    fn schema() -> TypeSchema {
        TypeSchema::new("pet").with_source("type.pet").with_field(
            FieldDescriptor::new("name", FieldType::String)
                .with_store_key("pet.name")
                .with_predicate(),
        )
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("uid", self.uid.clone().into()),
            ("name", self.name.clone().into()),
        ]
    }

    fn assign(&mut self, field: &str, value: Value) -> Result<(), Value> {
        match field {
            "uid" => self.uid = FromValue::from_value(value)?,
            "name" => self.name = FromValue::from_value(value)?,
            _ => return Err(value),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Owner {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub pets: Vec<Pet>,
}

impl Model for Owner {
    fn schema() -> TypeSchema {
        TypeSchema::new("owner")
            .with_source("type.owner")
            .with_field(
                FieldDescriptor::new("name", FieldType::String)
                    .with_store_key("owner.name")
                    .with_index(&["exact"]),
            )
            .with_field(
                FieldDescriptor::new("pets", FieldType::Uid)
                    .with_store_key("owner.pets")
                    .with_alter(Directive::predicate("owner.pets", "[uid]")),
            )
            .depends_on::<Pet>()
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("uid", self.uid.clone().into()),
            ("name", self.name.clone().into()),
            (
                "pets",
                Value::List(self.pets.iter().cloned().map(Value::record).collect()),
            ),
        ]
    }

    fn assign(&mut self, field: &str, value: Value) -> Result<(), Value> {
        match field {
            "uid" => self.uid = FromValue::from_value(value)?,
            "name" => self.name = FromValue::from_value(value)?,
            "pets" => self.pets = value.into_models()?,
            _ => return Err(value),
        }
        Ok(())
    }
}

/// In-memory stand-in for a graph store.
///
/// Mutations are recorded and every blank node name gets a fresh `0x..`
/// id. Queries answer from a queue of canned results.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub schema: Mutex<Vec<Directive>>,
    pub alters: Mutex<Vec<SchemaPayload>>,
    pub mutations: Mutex<Vec<JsonValue>>,
    pub queries: Mutex<Vec<(String, Params)>>,
    results: Mutex<VecDeque<JsonValue>>,
    failure: Mutex<Option<StoreError>>,
    next_uid: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: Vec<Directive>) -> Self {
        let store = Self::new();
        *store.schema.lock().unwrap() = schema;
        store
    }

    /// Queue the result of the next query.
    pub fn respond(&self, result: JsonValue) {
        self.results.lock().unwrap().push_back(result);
    }

    /// Make every following call fail with `error`.
    pub fn fail_with(&self, error: StoreError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn alter_count(&self) -> usize {
        self.alters.lock().unwrap().len()
    }

    pub fn last_mutation(&self) -> Option<JsonValue> {
        self.mutations.lock().unwrap().last().cloned()
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn collect_blanks(&self, data: &JsonValue, uids: &mut Uids) {
        match data {
            JsonValue::Object(node) => {
                if let Some(blank) = node
                    .get("uid")
                    .and_then(JsonValue::as_str)
                    .and_then(|uid| uid.strip_prefix("_:"))
                {
                    if !uids.contains_key(blank) {
                        let id = self.next_uid.fetch_add(1, Ordering::SeqCst) + 1;
                        uids.insert(blank.to_string(), format!("{id:#x}"));
                    }
                }
                for value in node.values() {
                    self.collect_blanks(value, uids);
                }
            }
            JsonValue::Array(items) => {
                for item in items {
                    self.collect_blanks(item, uids);
                }
            }
            _ => {}
        }
    }
}

#[async_trait]
impl Connection for MemoryStore {
    async fn mutate(&self, data: &JsonValue) -> Result<Uids, StoreError> {
        self.check()?;
        let mut uids = Uids::new();
        self.collect_blanks(data, &mut uids);
        self.mutations.lock().unwrap().push(data.clone());
        Ok(uids)
    }

    async fn query(&self, statement: &str, params: &Params) -> Result<JsonValue, StoreError> {
        self.check()?;
        self.queries
            .lock()
            .unwrap()
            .push((statement.to_string(), params.clone()));
        Ok(self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(JsonValue::Null))
    }

    async fn query_schema(&self) -> Result<SchemaPayload, StoreError> {
        self.check()?;
        Ok(SchemaPayload::new(self.schema.lock().unwrap().clone()))
    }

    async fn alter(&self, payload: &SchemaPayload) -> Result<(), StoreError> {
        self.check()?;
        self.schema
            .lock()
            .unwrap()
            .extend(payload.schema.iter().cloned());
        self.alters.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

/// Log output for a test run, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
