//! World Store: the single authoritative holder of the session's world.
//!
//! # Invariants
//! - All world mutations flow through the store's explicit operations.
//! - A failed load never disturbs the installed world.
//! - The loading flag clears once every started load has finished or been abandoned.
//! - Out-of-bounds tile updates are logged and ignored, never raised.

mod store;

pub use store::{LoadOutcome, LoadTicket, WorldStore};
