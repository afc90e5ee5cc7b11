//! # Marker Store
//!
//! Two logical sets keyed by [`MarkerKey`]:
//!
//! - **static**: permanent markers (spawn, local player), never evicted
//! - **procedural**: everything drawn on the map, subject to culling
//!
//! A static marker is normally present in both sets; its static membership
//! is what protects it from eviction.
//!
//! ## Concurrency
//!
//! The store is a cheap `Clone` handle over shared state. Only the owning
//! thread mutates it. Background scans take a [`StoreSnapshot`] under a
//! read lock, which sees each element either before or after a concurrent
//! insert, never half written.
//!
//! Locks are always taken procedural first, then static.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::marker::{Marker, MarkerKey};

#[derive(Debug, Default)]
struct StoreInner {
    procedural: RwLock<HashMap<MarkerKey, Marker>>,
    statics: RwLock<HashMap<MarkerKey, Marker>>,
}

/// Shared handle to the marker sets of one open map.
#[derive(Clone, Debug, Default)]
pub struct MarkerStore {
    inner: Arc<StoreInner>,
}

/// Point-in-time copy of the store, handed to background scans.
#[derive(Clone, Debug, Default)]
pub struct StoreSnapshot {
    /// Procedural markers at snapshot time.
    pub procedural: Vec<Marker>,
    /// Keys of the static set at snapshot time.
    pub statics: HashSet<MarkerKey>,
}

impl MarkerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts into the procedural set, replacing any equal marker.
    ///
    /// Returns the replaced instance.
    pub fn add(&self, marker: Marker) -> Option<Marker> {
        let key = marker.key();
        trace!(?key, "marker added");
        self.inner.procedural.write().insert(key, marker)
    }

    /// Inserts into both sets.
    pub fn add_static(&self, marker: Marker) {
        self.mark_static(&marker);
        self.add(marker);
    }

    /// Adds a marker to the static set only.
    pub fn mark_static(&self, marker: &Marker) {
        self.inner.statics.write().insert(marker.key(), marker.clone());
    }

    /// Removes a marker from both sets. Absent markers are ignored.
    ///
    /// Returns true if anything was removed.
    pub fn remove(&self, marker: &Marker) -> bool {
        let key = marker.key();
        let from_procedural = self.inner.procedural.write().remove(&key).is_some();
        let from_statics = self.inner.statics.write().remove(&key).is_some();
        from_procedural || from_statics
    }

    /// Evicts procedural markers by key.
    ///
    /// Keys in the static set are skipped even if requested. Returns the
    /// markers actually removed so their views can be detached.
    pub fn evict(&self, keys: &[MarkerKey]) -> Vec<Marker> {
        let mut procedural = self.inner.procedural.write();
        let statics = self.inner.statics.read();
        keys.iter()
            .filter(|key| !statics.contains_key(*key))
            .filter_map(|key| procedural.remove(key))
            .collect()
    }

    /// Removes every procedural marker that is not static.
    pub fn clear_transient(&self) -> Vec<Marker> {
        let mut procedural = self.inner.procedural.write();
        let statics = self.inner.statics.read();
        let transient: Vec<MarkerKey> = procedural
            .keys()
            .filter(|key| !statics.contains_key(*key))
            .cloned()
            .collect();
        transient
            .iter()
            .filter_map(|key| procedural.remove(key))
            .collect()
    }

    /// Drops both sets.
    pub fn clear(&self) {
        self.inner.procedural.write().clear();
        self.inner.statics.write().clear();
    }

    /// Returns true if an equal marker is in the procedural set.
    #[must_use]
    pub fn contains(&self, marker: &Marker) -> bool {
        self.inner.procedural.read().contains_key(&marker.key())
    }

    /// Returns true if an equal marker is in the static set.
    #[must_use]
    pub fn is_static(&self, marker: &Marker) -> bool {
        self.inner.statics.read().contains_key(&marker.key())
    }

    /// Stored procedural instance equal to `key`.
    #[must_use]
    pub fn get(&self, key: &MarkerKey) -> Option<Marker> {
        self.inner.procedural.read().get(key).cloned()
    }

    /// Number of procedural markers.
    #[must_use]
    pub fn procedural_len(&self) -> usize {
        self.inner.procedural.read().len()
    }

    /// Number of static markers.
    #[must_use]
    pub fn static_len(&self) -> usize {
        self.inner.statics.read().len()
    }

    /// Copies of all procedural markers.
    #[must_use]
    pub fn procedural(&self) -> Vec<Marker> {
        self.inner.procedural.read().values().cloned().collect()
    }

    /// Union of both sets, each marker once, for rendering.
    #[must_use]
    pub fn all(&self) -> Vec<Marker> {
        let procedural = self.inner.procedural.read();
        let statics = self.inner.statics.read();
        let mut all: Vec<Marker> = procedural.values().cloned().collect();
        all.extend(
            statics
                .iter()
                .filter(|(key, _)| !procedural.contains_key(*key))
                .map(|(_, marker)| marker.clone()),
        );
        all
    }

    /// Takes a snapshot for a background scan.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let procedural = self.inner.procedural.read().values().cloned().collect();
        let statics = self.inner.statics.read().keys().cloned().collect();
        StoreSnapshot {
            procedural,
            statics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemark_shared::{Dimension, EntityKind, IconCatalog, IconProvider, NamedIcon};

    fn cow_icon() -> Arc<dyn IconProvider> {
        IconCatalog::builtin().entity(11).expect("cow is built in")
    }

    fn cow(x: i32, z: i32) -> Marker {
        Marker::new(x, 64, z, Dimension::OVERWORLD, cow_icon(), false)
    }

    #[test]
    fn test_add_replaces_equal_marker() {
        let store = MarkerStore::new();
        assert!(store.add(cow(1, 1)).is_none());

        let renamed: Arc<dyn IconProvider> =
            Arc::new(NamedIcon::new(cow_icon(), "Daisy"));
        let replacement = Marker::new(1, 64, 1, Dimension::OVERWORLD, renamed, false);
        let replaced = store.add(replacement.clone()).expect("equal marker replaced");

        assert_eq!(replaced.display_name(), "Cow");
        assert_eq!(store.procedural_len(), 1);
        let stored = store.get(&replacement.key()).expect("still stored");
        assert_eq!(stored.display_name(), "Daisy");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = MarkerStore::new();
        let marker = cow(3, 4);
        store.add_static(marker.clone());
        assert!(store.is_static(&marker));

        assert!(store.remove(&marker));
        assert!(!store.remove(&marker));
        assert!(!store.contains(&marker));
        assert!(!store.is_static(&marker));
    }

    #[test]
    fn test_evict_skips_static() {
        let store = MarkerStore::new();
        let keep = Marker::new(0, 0, 0, Dimension::OVERWORLD, Arc::new(EntityKind::PLAYER), false);
        store.add_static(keep.clone());
        store.add(cow(9, 9));

        let evicted = store.evict(&[keep.key(), cow(9, 9).key()]);
        assert_eq!(evicted.len(), 1);
        assert!(store.contains(&keep));
        assert_eq!(store.procedural_len(), 1);
    }

    #[test]
    fn test_clear_transient_and_union() {
        let store = MarkerStore::new();
        let spawn = Marker::new(0, 70, 0, Dimension::OVERWORLD, Arc::new(EntityKind::PLAYER), false);
        store.add_static(spawn.clone());
        for i in 0..10 {
            store.add(cow(i, -i));
        }
        assert_eq!(store.all().len(), 11);

        let removed = store.clear_transient();
        assert_eq!(removed.len(), 10);
        assert_eq!(store.procedural(), vec![spawn]);
    }
}
