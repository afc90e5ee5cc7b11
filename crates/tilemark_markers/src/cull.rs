//! # Viewport Culler
//!
//! Keeps the number of procedural markers bounded by dropping the ones that
//! scrolled far out of view.
//!
//! ## Lifecycle
//!
//! ```text
//! add() ──▶ CullThrottle::on_insert ──Started──▶ CullJob::run (background)
//!                    │                                   │
//!                    │ Counting / Skipped                ▼ CullReport
//!                    ▼                      owning thread: store.evict(..)
//!                 (nothing)                              │
//!                                                        ▼
//!                                            CullThrottle::finish()
//! ```
//!
//! A run is single-flight: while one is in flight further insertions are
//! neither counted nor able to start another. The guard is cleared only
//! after the eviction batch has been applied.

use std::sync::atomic::{AtomicBool, Ordering};

use tilemark_shared::Viewport;
use tracing::debug;

use crate::marker::MarkerKey;
use crate::store::StoreSnapshot;

/// Outcome of registering one insertion with the throttle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullTrigger {
    /// Threshold crossed: the caller must launch a run.
    Started,
    /// Counted towards the next run.
    Counting,
    /// A run is already in flight; nothing counted.
    Skipped,
}

/// Insertion counter plus the single-flight guard.
#[derive(Debug)]
pub struct CullThrottle {
    interval: u32,
    counter: u32,
    in_flight: AtomicBool,
}

impl CullThrottle {
    /// Creates a throttle that fires after more than `interval` insertions.
    #[must_use]
    pub const fn new(interval: u32) -> Self {
        Self {
            interval,
            counter: 0,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Registers one insertion.
    pub fn on_insert(&mut self) -> CullTrigger {
        if self.in_flight.load(Ordering::Acquire) {
            return CullTrigger::Skipped;
        }
        self.counter += 1;
        if self.counter <= self.interval {
            return CullTrigger::Counting;
        }
        self.counter = 0;
        self.in_flight.store(true, Ordering::Release);
        CullTrigger::Started
    }

    /// Clears the in-flight guard once a run's evictions are applied.
    pub fn finish(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    /// Returns true while a run is in flight.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Insertions counted since the last run.
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.counter
    }
}

/// One culling run: a store snapshot and the viewport computed at trigger time.
#[derive(Clone, Debug)]
pub struct CullJob {
    /// Store contents when the run was triggered.
    pub snapshot: StoreSnapshot,
    /// Block-space rectangle to keep.
    pub viewport: Viewport,
}

/// Result of a culling run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CullReport {
    /// Procedural markers to evict.
    pub evicted: Vec<MarkerKey>,
    /// Number of procedural markers looked at.
    pub scanned: usize,
}

impl CullJob {
    /// Runs the scan. Read-only; never fails.
    #[must_use]
    pub fn run(self) -> CullReport {
        let evicted = scan(&self.snapshot, &self.viewport);
        debug!(
            scanned = self.snapshot.procedural.len(),
            evicted = evicted.len(),
            "cull scan finished"
        );
        CullReport {
            evicted,
            scanned: self.snapshot.procedural.len(),
        }
    }
}

/// Keys of procedural markers that are not static and lie outside the
/// viewport or in another dimension.
#[must_use]
pub fn scan(snapshot: &StoreSnapshot, viewport: &Viewport) -> Vec<MarkerKey> {
    snapshot
        .procedural
        .iter()
        .filter(|marker| !viewport.contains(marker.x, marker.z, &marker.dimension))
        .map(crate::marker::Marker::key)
        .filter(|key| !snapshot.statics.contains(key))
        .collect()
}
