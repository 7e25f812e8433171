//! Shared types used across the tileworld crates.

mod types;

pub use types::{Dimensions, GridPos, LayerKind, Mode, ParseError};
