//! Table of named registries.
//!
//! Each repository name owns exactly one registry task. The table is
//! thread-safe and can be shared via `Arc`.

use std::sync::Arc;

use dashmap::DashMap;

use super::RegistryHandle;
use crate::config::DEFAULT_MAILBOX;

/// Running registries, keyed by repository name.
#[derive(Debug)]
pub struct Registries {
    registries: DashMap<String, RegistryHandle>,
    /// Mailbox capacity of registries started by this table
    capacity: usize,
}

impl Default for Registries {
    fn default() -> Self {
        Self::new(DEFAULT_MAILBOX)
    }
}

impl Registries {
    pub fn new(capacity: usize) -> Self {
        Self {
            registries: DashMap::new(),
            capacity,
        }
    }

    /// Create a new table wrapped in Arc for sharing.
    pub fn new_shared(capacity: usize) -> Arc<Self> {
        Arc::new(Self::new(capacity))
    }

    /// The registry named `name`, started on first use.
    ///
    /// Must be called from within a tokio runtime.
    pub fn get_or_start(&self, name: &str) -> RegistryHandle {
        self.get_or_start_with(name, self.capacity)
    }

    /// Like [`get_or_start`](Self::get_or_start); `capacity` only applies
    /// when the registry is not running yet.
    pub fn get_or_start_with(&self, name: &str, capacity: usize) -> RegistryHandle {
        if let Some(handle) = self.registries.get(name) {
            if !handle.is_closed() {
                return handle.clone();
            }
        }

        self.registries
            .entry(name.to_string())
            .and_modify(|handle| {
                if handle.is_closed() {
                    *handle = RegistryHandle::spawn(name, capacity);
                }
            })
            .or_insert_with(|| RegistryHandle::spawn(name, capacity))
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<RegistryHandle> {
        self.registries.get(name).map(|handle| handle.clone())
    }

    /// Stop and forget the registry named `name`.
    pub async fn stop(&self, name: &str) -> bool {
        match self.registries.remove(name) {
            Some((_, handle)) => {
                handle.stop().await;
                tracing::debug!(registry = %name, "Registry removed");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    /// Names of the known registries, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registries
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}
