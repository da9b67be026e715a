//! Type registry: discriminator string to registered type.

use crate::codec::marker_key;
use crate::Provider;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registered types by the marker key of their `source()` discriminator.
///
/// BTreeMap keeps iteration deterministic.
pub type TypeMap = BTreeMap<String, Provider>;

/// Add `providers` to `map`, keyed by the marker key of their source, the
/// same key [`encode`](crate::encode) writes.
///
/// Providers without a source are skipped. A later provider with the same
/// source replaces the earlier one; `person` and `type.person` are the same
/// source.
pub fn build_lookup_map(mut map: TypeMap, providers: &[Provider]) -> TypeMap {
    for provider in providers {
        if let Some(source) = provider.source() {
            map.insert(marker_key(source), Arc::clone(provider));
        }
    }
    map
}
