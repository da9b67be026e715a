//! Record types shared by the engine integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use graft_engine::{
    build_lookup_map, provider, Directive, FieldDescriptor, FieldType, FromValue, Geo, Model,
    TypeMap, TypeSchema, Value,
};
use serde_json::json;

/// Every scalar field type in one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    pub uid: Option<String>,
    pub login: Option<String>,
    pub secret: Option<String>,
    pub logins: Option<i64>,
    pub balance: Option<f64>,
    pub active: Option<bool>,
    pub joined: Option<DateTime<Utc>>,
    pub location: Option<Geo>,
    pub extra: Option<serde_json::Value>,
    pub tags: Vec<String>,
    /// Not in the field table; never stored
    pub session: Option<String>,
}

impl Model for Account {
    fn schema() -> TypeSchema {
        TypeSchema::new("account")
            .with_source("type.account")
            .with_field(
                FieldDescriptor::new("login", FieldType::String)
                    .with_store_key("account.login")
                    .with_alter(
                        Directive::predicate("account.login", "string")
                            .with("index", true)
                            .with("tokenizer", json!(["exact"]))
                            .with("upsert", true),
                    ),
            )
            .with_field(
                FieldDescriptor::new("secret", FieldType::Password)
                    .with_store_key("account.secret")
                    .with_predicate(),
            )
            .with_field(
                FieldDescriptor::new("logins", FieldType::Integer)
                    .with_store_key("account.logins")
                    .with_predicate(),
            )
            .with_field(
                FieldDescriptor::new("balance", FieldType::Float)
                    .with_store_key("account.balance")
                    .with_predicate(),
            )
            .with_field(
                FieldDescriptor::new("active", FieldType::Boolean)
                    .with_store_key("account.active")
                    .with_predicate(),
            )
            .with_field(
                FieldDescriptor::new("joined", FieldType::DateTime)
                    .with_store_key("account.joined")
                    .with_index(&["hour"]),
            )
            .with_field(
                FieldDescriptor::new("location", FieldType::Geo)
                    .with_store_key("account.location")
                    .with_index(&["geo"]),
            )
            .with_field(
                FieldDescriptor::new("extra", FieldType::Auto).with_store_key("account.extra"),
            )
            .with_field(
                FieldDescriptor::new("tags", FieldType::String)
                    .with_store_key("account.tags")
                    .with_alter(Directive::predicate("account.tags", "[string]")),
            )
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("uid", self.uid.clone().into()),
            ("login", self.login.clone().into()),
            ("secret", self.secret.clone().into()),
            ("logins", self.logins.into()),
            ("balance", self.balance.into()),
            ("active", self.active.into()),
            ("joined", self.joined.into()),
            ("location", self.location.clone().into()),
            ("extra", self.extra.clone().into()),
            (
                "tags",
                if self.tags.is_empty() {
                    Value::Null
                } else {
                    self.tags.clone().into()
                },
            ),
            ("session", self.session.clone().into()),
        ]
    }

    fn assign(&mut self, field: &str, value: Value) -> Result<(), Value> {
        match field {
            "uid" => self.uid = FromValue::from_value(value)?,
            "login" => self.login = FromValue::from_value(value)?,
            "secret" => self.secret = FromValue::from_value(value)?,
            "logins" => self.logins = FromValue::from_value(value)?,
            "balance" => self.balance = FromValue::from_value(value)?,
            "active" => self.active = FromValue::from_value(value)?,
            "joined" => self.joined = FromValue::from_value(value)?,
            "location" => self.location = FromValue::from_value(value)?,
            "extra" => self.extra = FromValue::from_value(value)?,
            "tags" => self.tags = FromValue::from_value(value)?,
            "session" => self.session = FromValue::from_value(value)?,
            _ => return Err(value),
        }
        Ok(())
    }
}

/// Third link of a dependency chain: company -> employee -> address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub uid: Option<String>,
    pub city: Option<String>,
}

impl Model for Address {
    fn schema() -> TypeSchema {
        TypeSchema::new("address")
            .with_source("type.address")
            .with_field(
                FieldDescriptor::new("city", FieldType::String)
                    .with_store_key("address.city")
                    .with_predicate(),
            )
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("uid", self.uid.clone().into()),
            ("city", self.city.clone().into()),
        ]
    }

    fn assign(&mut self, field: &str, value: Value) -> Result<(), Value> {
        match field {
            "uid" => self.uid = FromValue::from_value(value)?,
            "city" => self.city = FromValue::from_value(value)?,
            _ => return Err(value),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Employee {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub home: Option<Address>,
}

impl Model for Employee {
    fn schema() -> TypeSchema {
        TypeSchema::new("employee")
            .with_source("type.employee")
            .with_field(
                FieldDescriptor::new("name", FieldType::String)
                    .with_store_key("name")
                    .with_index(&["term"]),
            )
            .with_field(
                FieldDescriptor::new("home", FieldType::Uid)
                    .with_store_key("employee.home")
                    .with_predicate(),
            )
            .depends_on::<Address>()
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("uid", self.uid.clone().into()),
            ("name", self.name.clone().into()),
            ("home", self.home.clone().map(Value::record).unwrap_or_default()),
        ]
    }

    fn assign(&mut self, field: &str, value: Value) -> Result<(), Value> {
        match field {
            "uid" => self.uid = FromValue::from_value(value)?,
            "name" => self.name = FromValue::from_value(value)?,
            "home" => self.home = value.into_model()?,
            _ => return Err(value),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Company {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub staff: Vec<Employee>,
}

impl Model for Company {
    fn schema() -> TypeSchema {
        TypeSchema::new("company")
            .with_source("type.company")
            // shares the `name` predicate with Employee
            .with_field(
                FieldDescriptor::new("name", FieldType::String)
                    .with_store_key("name")
                    .with_index(&["term"]),
            )
            .with_field(
                FieldDescriptor::new("staff", FieldType::Uid)
                    .with_store_key("company.staff")
                    .with_alter(Directive::predicate("company.staff", "[uid]")),
            )
            .depends_on::<Employee>()
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("uid", self.uid.clone().into()),
            ("name", self.name.clone().into()),
            (
                "staff",
                if self.staff.is_empty() {
                    Value::Null
                } else {
                    Value::List(self.staff.iter().cloned().map(Value::record).collect())
                },
            ),
        ]
    }

    fn assign(&mut self, field: &str, value: Value) -> Result<(), Value> {
        match field {
            "uid" => self.uid = FromValue::from_value(value)?,
            "name" => self.name = FromValue::from_value(value)?,
            "staff" => self.staff = value.into_models()?,
            _ => return Err(value),
        }
        Ok(())
    }
}

pub fn all_types() -> TypeMap {
    build_lookup_map(
        TypeMap::new(),
        &[
            provider::<Account>(),
            provider::<Address>(),
            provider::<Employee>(),
            provider::<Company>(),
        ],
    )
}

pub fn node(value: serde_json::Value) -> graft_engine::Node {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}
