//! Tile interaction: click/hover events from the rendering surface mapped to
//! store actions.
//!
//! # Invariants
//! - Events always carry the layer they originated on.
//! - The policy decides; only [`TileAction::apply`] touches the store.

pub mod action;

pub use action::{
    SWITCH_TILE, TileAction, TileEvent, dispatch_click, handle_tile_click, handle_tile_hover,
    next_switch_state,
};
