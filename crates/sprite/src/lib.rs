//! Sprite animation: a looping idle animation plus optional press and release
//! animations driven by pointer events.
//!
//! ```text
//! Idle --pointer down--> MouseDown --frames done--> Holding
//!   ^                        |                         |
//!   |                        +------pointer up---------+--> MouseUp
//!   +-------------------------frames done--------------------+
//! ```
//!
//! # Invariants
//! - Exactly one transition per event, applied synchronously.
//! - At most one frame timer per sprite; it is re-armed whenever the active
//!   animation changes (see [`SpriteAnimator::timer_epoch`]).

mod animator;
mod config;
mod player;

pub use animator::{SpriteAnimator, SpriteFrame, SpriteState};
pub use config::{AnimationDescriptor, DEFAULT_FPS, SpriteConfig};
pub use player::SpritePlayer;
