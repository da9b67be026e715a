//! Schema snapshots and deltas.
//!
//! A snapshot is the full list of directives the registered types need.
//! The delta against the store's live schema is what still has to be
//! applied.

use crate::{Directive, Provider};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Add the direct dependencies of `registered` to the set.
///
/// This is a single pass over the registered types: a dependency of a
/// dependency is only included if it is itself registered or a direct
/// dependency of a registered type. The result is ordered by type name.
pub fn expand(registered: &[Provider]) -> Vec<Provider> {
    let mut working: BTreeMap<String, Provider> = registered
        .iter()
        .map(|provider| (provider.name().to_string(), Arc::clone(provider)))
        .collect();

    for provider in registered {
        for dependency in provider.depends_on() {
            working
                .entry(dependency.name().to_string())
                .or_insert(dependency);
        }
    }

    working.into_values().collect()
}

/// Concatenate the directives of `types`, in order. Duplicates are kept.
pub fn directives(types: &[Provider]) -> Vec<Directive> {
    types.iter().flat_map(|provider| provider.alter()).collect()
}

/// Directives needed to realize `registered` and its direct dependencies.
pub fn snapshot(registered: &[Provider]) -> Vec<Directive> {
    directives(&expand(registered))
}

/// `snapshot` minus `live`, as an ordered multiset difference.
///
/// Each live directive removes the first equal entry still in the
/// snapshot, so a directive wanted N times but present M < N times
/// contributes N - M entries.
pub fn delta(snapshot: &[Directive], live: &[Directive]) -> Vec<Directive> {
    let mut remaining = snapshot.to_vec();
    for directive in live {
        if let Some(index) = remaining.iter().position(|wanted| wanted == directive) {
            remaining.remove(index);
        }
    }
    remaining
}
