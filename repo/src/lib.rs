//! # graft-repo
//!
//! Repositories on top of [`graft_engine`]: a registry task per repository
//! name holding the registered record types, schema synchronization against
//! the store, and the record workflows (`set`, `get`, `all`).
//!
//! The store itself is reached through the [`Connection`] trait; this crate
//! never speaks its wire protocol.
//!
//! ## Example
//!
//! ```ignore
//! let config = Config::load()?;
//! let registries = Registries::default();
//! let repo = Repo::start(&config, &registries, client, vec![provider::<Person>()]).await?;
//!
//! repo.alter_schema().await?;
//! let ann = repo.set(Person { name: Some("Ann".into()), ..Default::default() }).await?;
//! let found = repo.get(ann.uid.as_deref().unwrap_or_default()).await?;
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod repo;
pub mod store;
pub mod sync;

pub use config::{Config, ConfigError};
pub use error::{RepoError, Result};
pub use registry::{Registries, RegistryHandle};
pub use repo::{Repo, GET_BY_UID, GET_BY_UID_BLOCK};
pub use store::{Connection, Params, SchemaPayload, StoreError, Uids};
pub use sync::{alter_schema, alter_schema_strict};
