//! World loading: the JSON world document, tile normalization, and the
//! loader seam the world store delegates to.
//!
//! # Invariants
//! - Every tile leaving this crate has passed kernel validation.
//! - Both historical layer field names are read; only the canonical
//!   `*TileMap` names are written.

mod document;
mod error;
mod source;

pub use document::{
    LayerDocument, SchemaVariant, TileDocument, WorldDocument, parse_world, world_to_json,
};
pub use error::LoadError;
pub use source::{FileWorldLoader, MemoryWorldLoader, WorldLoader};
