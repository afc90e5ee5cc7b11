//! # Tilemark Markers
//!
//! Everything that decides which markers exist and which are shown.
//!
//! ```text
//!            add / remove (owning thread)
//!                      │
//!                      ▼
//!   ┌──────────────────────────────────┐   snapshot   ┌───────────┐
//!   │ MarkerStore                      │─────────────▶│ CullJob   │
//!   │   static set    procedural set   │◀─────────────│ (worker)  │
//!   └──────────────────────────────────┘  evict keys  └───────────┘
//!                      │
//!                      ▼
//!               MarkerFilter::is_visible ──▶ MarkerCanvas
//! ```

#![deny(unsafe_code)]

pub mod canvas;
pub mod cull;
pub mod filter;
pub mod marker;
pub mod store;

pub use canvas::MarkerCanvas;
pub use cull::{scan, CullJob, CullReport, CullThrottle, CullTrigger};
pub use filter::{FilterChoice, FilterEdit, MarkerFilter};
pub use marker::{Marker, MarkerKey};
pub use store::{MarkerStore, StoreSnapshot};
