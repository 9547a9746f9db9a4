use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Picker lists that are memoized per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    ServiceTypes,
    Stations,
    FuelTypes,
    Workshops,
}

impl LookupKind {
    /// Kinds derived from the maintenance table.
    pub const MAINTENANCE: &'static [LookupKind] = &[LookupKind::ServiceTypes];
    /// Kinds derived from the fuel table.
    pub const FUEL: &'static [LookupKind] = &[LookupKind::Stations, LookupKind::FuelTypes];
}

/// Memo of lookup lists keyed by cache scope (a demo session id, or one
/// shared scope over a persistent database). Invalidated explicitly when the
/// underlying records change.
///
/// Every `(scope, kind)` carries a generation. `invalidate` and
/// `clear_scope` move it forward, so a list built from a read that started
/// before a write is never stored.
#[derive(Default)]
pub struct LookupCache {
    entries: DashMap<(String, LookupKind), Arc<Vec<String>>>,
    generations: DashMap<(String, LookupKind), u64>,
    epoch: AtomicU64,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_generation(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self, scope: &str, kind: LookupKind) -> Option<Arc<Vec<String>>> {
        self.entries
            .get(&(scope.to_string(), kind))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Current generation of `(scope, kind)`. Capture it before reading the
    /// records a list is built from.
    pub fn generation(&self, scope: &str, kind: LookupKind) -> u64 {
        *self
            .generations
            .entry((scope.to_string(), kind))
            .or_insert_with(|| self.next_generation())
    }

    /// Sorts and de-duplicates `values`. The list is stored only if nothing
    /// was invalidated since `generation` was captured; it is returned either
    /// way.
    pub fn insert<I>(
        &self,
        scope: &str,
        kind: LookupKind,
        generation: u64,
        values: I,
    ) -> Arc<Vec<String>>
    where
        I: IntoIterator<Item = String>,
    {
        let list: Arc<Vec<String>> = Arc::new(
            values
                .into_iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        );

        let key = (scope.to_string(), kind);
        // Held until the entry is written so an invalidation cannot slip in between
        let current = self
            .generations
            .entry(key.clone())
            .or_insert_with(|| self.next_generation());
        if *current == generation {
            self.entries.insert(key, Arc::clone(&list));
        }
        list
    }

    pub fn invalidate(&self, scope: &str, kinds: &[LookupKind]) {
        for kind in kinds {
            let key = (scope.to_string(), *kind);
            self.generations.insert(key.clone(), self.next_generation());
            self.entries.remove(&key);
        }
    }

    pub fn clear_scope(&self, scope: &str) {
        self.generations.retain(|(owner, _), _| owner != scope);
        self.entries.retain(|(owner, _), _| owner != scope);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
