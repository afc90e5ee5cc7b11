//! # Tilemark
//!
//! Marker and world-coordinate engine behind a voxel world map viewer.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────── owning thread ─────────────────────────┐
//! │                                                                 │
//! │  taps / long presses ──▶ MapSession ──▶ MarkerCanvas (views)    │
//! │                            │   ▲                                │
//! │                       Job  │   │ Completion (pump / settle)     │
//! └────────────────────────────┼───┼────────────────────────────────┘
//!                              ▼   │
//!                         ┌──────────────┐
//!                         │  TaskWorker  │──▶ WorldData (tags, players)
//!                         └──────────────┘
//! ```
//!
//! The session owns the marker store and is the only code mutating it.
//! Culling scans, player lookups and teleports run on the worker and come
//! back as completions.

#![deny(unsafe_code)]

pub mod actions;
pub mod config;
pub mod contracts;
pub mod error;
pub mod memory;
pub mod notice;
pub mod session;
pub mod tasks;
pub mod teleport;

pub use actions::{LongPressAction, MarkerTapAction, PressedPosition};
pub use config::{FilterOverrides, MapConfig, ScreenSize};
pub use contracts::{
    parse_coordinate, validate_marker_fields, BlockPos, ChunkDataKind, EditableTags, EntityRef,
    MarkerPersistence, PlayerPosition, WorldContext, WorldData,
};
pub use error::{
    ConfigError, MapError, MapResult, MarkerFieldError, StorageError, StorageResult,
};
pub use memory::{
    player_record, HeadlessCanvas, MemoryContext, MemoryMarkerBook, MemoryWorld, PlacedView,
};
pub use notice::Notice;
pub use session::{Camera, MapSession, LOCAL_PLAYER_NAME};
pub use tasks::{Completion, Job, TaskWorker, TeleportOrigin, TeleportRequest};
pub use teleport::{read_position, teleport_patch, teleport_record, TeleportTarget};

/// Session over the in-memory collaborators.
pub type MemorySession = MapSession<MemoryContext, MemoryWorld, MemoryMarkerBook, HeadlessCanvas>;
