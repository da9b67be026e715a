//! The registry task and its handle.
//!
//! One task owns the registered type set of a named repository. Commands are
//! handled one at a time in arrival order, so a `get` issued after a
//! `register` completed always sees that registration.

use std::collections::BTreeMap;

use graft_engine::{build_lookup_map, Directive, Provider, TypeMap};
use tokio::sync::{mpsc, oneshot};

use super::protocol::Command;
use crate::error::{RepoError, Result};

/// Cheap, cloneable handle to a running registry task.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    name: String,
    sender: mpsc::Sender<Command>,
}

impl RegistryHandle {
    /// Spawn a registry task on the current tokio runtime.
    pub fn spawn(name: impl Into<String>, capacity: usize) -> Self {
        let name = name.into();
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        tokio::spawn(run(name.clone(), receiver));
        tracing::info!(registry = %name, capacity, "Registry started");

        Self { name, sender }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register providers. Returns how many were not registered before;
    /// a provider is identified by its name.
    pub async fn register(&self, providers: Vec<Provider>) -> Result<usize> {
        let (reply, answer) = oneshot::channel();
        self.send(Command::Register { providers, reply }).await?;
        answer.await.map_err(|_| self.closed())
    }

    /// The registered set, ordered by type name.
    pub async fn get(&self) -> Result<Vec<Provider>> {
        let (reply, answer) = oneshot::channel();
        self.send(Command::Get { reply }).await?;
        answer.await.map_err(|_| self.closed())
    }

    /// Type registry built from the registered set.
    pub async fn lookup(&self) -> Result<TypeMap> {
        Ok(build_lookup_map(TypeMap::new(), &self.get().await?))
    }

    /// Directives needed to realize the registered set.
    pub async fn snapshot(&self) -> Result<Vec<Directive>> {
        Ok(graft_engine::snapshot(&self.get().await?))
    }

    /// Ask the task to stop. Commands already queued are still answered.
    pub async fn stop(&self) {
        let _ = self.sender.send(Command::Stop).await;
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.sender.send(command).await.map_err(|_| self.closed())
    }

    fn closed(&self) -> RepoError {
        RepoError::RegistryClosed(self.name.clone())
    }
}

async fn run(name: String, mut receiver: mpsc::Receiver<Command>) {
    let mut registered: BTreeMap<String, Provider> = BTreeMap::new();

    while let Some(command) = receiver.recv().await {
        match command {
            Command::Register { providers, reply } => {
                let mut added = 0;
                for provider in providers {
                    let key = provider.name().to_string();
                    if !registered.contains_key(&key) {
                        registered.insert(key, provider);
                        added += 1;
                    }
                }

                tracing::debug!(
                    registry = %name,
                    added,
                    total = registered.len(),
                    "Registered types"
                );
                let _ = reply.send(added);
            }
            Command::Get { reply } => {
                let _ = reply.send(registered.values().cloned().collect());
            }
            Command::Stop => break,
        }
    }

    tracing::info!(registry = %name, "Registry stopped");
}
