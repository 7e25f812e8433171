//! Rendering Adapter: what a drawing surface needs from the world, and nothing more.
//!
//! # Invariants
//! - Renderers read the world; they never mutate it.
//! - A layer is drawn (and hit-tested) only when its mode is `on`.
//!
//! The crate ships a text renderer for the CLI and tests. Pixel surfaces
//! implement [`Renderer`] themselves and use [`TileGrid`] to turn pointer
//! positions into tile events.

mod hit;
mod layers;
mod renderer;

pub use hit::{DEFAULT_TILE_SIZE, TileGrid};
pub use layers::{LayerConfig, LayerMode, LayerSet};
pub use renderer::{Renderer, TextRenderer, ViewMode};
