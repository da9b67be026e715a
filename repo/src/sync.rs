//! Schema synchronization.
//!
//! The store's schema is read, the snapshot of the registered types is
//! diffed against it, and only the missing directives are sent, in one
//! alter call. Nothing is locked here: two concurrent syncs may both send
//! overlapping directives, which the store's alter tolerates.

use graft_engine::{delta, Directive};

use crate::error::{strict, Result};
use crate::registry::RegistryHandle;
use crate::store::{Connection, SchemaPayload};

/// Directives needed to realize the types registered in `registry`.
pub async fn snapshot(registry: &RegistryHandle) -> Result<Vec<Directive>> {
    registry.snapshot().await
}

/// Apply the part of `snapshot` the store does not report yet.
///
/// Returns the number of directives applied; `0` means the store was
/// already in sync and no alter call was made. Store failures are returned
/// unchanged.
pub async fn alter_schema<C>(conn: &C, snapshot: &[Directive]) -> Result<usize>
where
    C: Connection + ?Sized,
{
    let live = conn.query_schema().await.map_err(|err| {
        tracing::warn!(error = %err, "Failed to read store schema");
        err
    })?;

    let missing = delta(snapshot, &live.schema);
    if missing.is_empty() {
        tracing::debug!(wanted = snapshot.len(), "Store schema already in sync");
        return Ok(0);
    }

    let count = missing.len();
    conn.alter(&SchemaPayload::new(missing)).await.map_err(|err| {
        tracing::warn!(error = %err, directives = count, "Failed to alter store schema");
        err
    })?;

    tracing::info!(directives = count, "Applied schema changes");
    Ok(count)
}

/// [`alter_schema`], panicking on failure.
pub async fn alter_schema_strict<C>(conn: &C, snapshot: &[Directive]) -> usize
where
    C: Connection + ?Sized,
{
    strict(alter_schema(conn, snapshot).await)
}
