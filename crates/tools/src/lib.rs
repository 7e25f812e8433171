//! Developer tooling: read-only queries over a world for debug output.
//!
//! # Invariants
//! - Tools never mutate the world they inspect.

mod inspector;

pub use inspector::{LayerSummary, TileInfo, WorldInspector, WorldSummary};
