//! Unified error handling for the repository.

use crate::config::ConfigError;
use crate::store::StoreError;

/// Repository error type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepoError {
    #[error("engine error: {0}")]
    Engine(#[from] graft_engine::Error),

    /// Failure reported by the store, unchanged.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("registry '{0}' is not running")]
    RegistryClosed(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, RepoError>;

/// Unwrap for the strict variants of fallible operations.
pub(crate) fn strict<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
