//! World Kernel: tiles, single-layer tile maps, and the layered world.
//!
//! # Invariants
//! - A tile's current state is always one of its declared states.
//! - A tile map is exactly `height` rows of `width` tiles and is never resized.
//! - All three layers of a world share the world's dimensions.
//! - Every cell owns its tile; writing one cell never changes another.

pub mod tile;
pub mod tilemap;
pub mod world;

pub use tile::{DEFAULT_STATE, Tile, TileOptions, ValidationError, presets};
pub use tilemap::{ShapeError, TileMap};
pub use world::World;
