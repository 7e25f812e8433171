use std::fmt;
use std::time::Duration;

use crate::config::{DEFAULT_FPS, SpriteConfig};

/// Phase of the click-and-hold cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteState {
    /// Playing the base animation.
    Idle,
    /// Playing the press animation.
    MouseDown,
    /// Parked on the last press frame until release.
    Holding,
    /// Playing the release animation.
    MouseUp,
}

/// The frame currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrame {
    pub animation: String,
    pub frame: u32,
}

impl SpriteFrame {
    /// Asset identifier, `{animation}_{frame}`.
    pub fn asset_key(&self) -> String {
        format!("{}_{}", self.animation, self.frame)
    }

    /// Conventional public path of the frame image.
    pub fn asset_path(&self) -> String {
        format!("/sprites/{}.png", self.asset_key())
    }
}

impl fmt::Display for SpriteFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.animation, self.frame)
    }
}

/// Tick interval for `fps`, or `None` when fps is not positive and finite
/// or the interval does not fit in a `Duration`.
fn interval_for(fps: f32) -> Option<Duration> {
    if !(fps.is_finite() && fps > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / f64::from(fps)).ok()
}

/// The animation being played in the current state.
struct Active<'a> {
    name: &'a str,
    frames: &'a [u32],
    looping: bool,
}

/// Explicit state machine for one sprite.
///
/// Driven by [`tick`](Self::tick) from a single repeating timer and by
/// pointer events. It never owns a timer itself; the host arms one at
/// [`frame_interval`](Self::frame_interval) and re-arms it whenever
/// [`timer_epoch`](Self::timer_epoch) changes.
#[derive(Debug, Clone)]
pub struct SpriteAnimator {
    config: SpriteConfig,
    state: SpriteState,
    frame_index: usize,
    pressed: bool,
    epoch: u64,
}

impl SpriteAnimator {
    pub fn new(mut config: SpriteConfig) -> Self {
        if interval_for(config.fps).is_none() {
            tracing::warn!(fps = config.fps, name = %config.name, "invalid fps, using default");
            config.fps = DEFAULT_FPS;
        }
        Self {
            config,
            state: SpriteState::Idle,
            frame_index: 0,
            pressed: false,
            epoch: 0,
        }
    }

    pub fn config(&self) -> &SpriteConfig {
        &self.config
    }

    pub fn state(&self) -> SpriteState {
        self.state
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Whether the pointer is logically held on the sprite.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Time between ticks, `1000 / fps` milliseconds.
    pub fn frame_interval(&self) -> Duration {
        interval_for(self.config.fps)
            .or_else(|| interval_for(DEFAULT_FPS))
            .unwrap_or(Duration::from_millis(100))
    }

    /// Changes every time the active animation changes; the host must then
    /// clear its timer and start a new one.
    pub fn timer_epoch(&self) -> u64 {
        self.epoch
    }

    /// No timer should run while the active animation has no frames.
    pub fn timer_active(&self) -> bool {
        !self.active().frames.is_empty()
    }

    fn active(&self) -> Active<'_> {
        let c = &self.config;
        let base = Active {
            name: &c.name,
            frames: &c.frames,
            looping: c.looping,
        };
        match (self.state, &c.on_mouse_down, &c.on_mouse_up) {
            (SpriteState::Idle, _, _) => base,
            (SpriteState::MouseDown, Some(down), _) => Active {
                name: &down.name,
                frames: &down.frames,
                looping: down.loops(),
            },
            (SpriteState::Holding, Some(down), _) => Active {
                name: &down.name,
                frames: down.frames.last().map(std::slice::from_ref).unwrap_or(&[]),
                looping: true,
            },
            (SpriteState::MouseUp, _, Some(up)) => Active {
                name: &up.name,
                frames: &up.frames,
                looping: up.loops(),
            },
            _ => base,
        }
    }

    /// The frame to display, or `None` when the active animation is empty.
    pub fn current_frame(&self) -> Option<SpriteFrame> {
        let active = self.active();
        active.frames.get(self.frame_index).map(|&frame| SpriteFrame {
            animation: active.name.to_string(),
            frame,
        })
    }

    fn enter(&mut self, state: SpriteState) {
        tracing::trace!(from = ?self.state, to = ?state, name = %self.config.name, "sprite transition");
        self.state = state;
        self.frame_index = 0;
        self.epoch += 1;
    }

    /// Advance one frame. When a play-once animation runs out, the next
    /// state is entered on this same tick.
    pub fn tick(&mut self) {
        let active = self.active();
        let len = active.frames.len();
        if len == 0 {
            return;
        }
        let looping = active.looping;

        let next = self.frame_index + 1;
        if next < len {
            self.frame_index = next;
        } else if looping {
            self.frame_index = 0;
        } else {
            match self.state {
                SpriteState::MouseDown => self.enter(SpriteState::Holding),
                SpriteState::MouseUp => self.enter(SpriteState::Idle),
                // A play-once idle animation rests on its last frame.
                SpriteState::Idle | SpriteState::Holding => {}
            }
        }
    }

    /// Start the press animation. Ignored when none is configured.
    /// Returns whether a transition happened.
    pub fn pointer_down(&mut self) -> bool {
        if self.config.on_mouse_down.is_none() {
            return false;
        }
        self.pressed = true;
        self.enter(SpriteState::MouseDown);
        true
    }

    /// Start the release animation if the pointer is held and one is configured.
    pub fn pointer_up(&mut self) -> bool {
        if !self.pressed || self.config.on_mouse_up.is_none() {
            return false;
        }
        self.pressed = false;
        self.enter(SpriteState::MouseUp);
        true
    }

    /// The pointer left the sprite. Treated as a release.
    pub fn pointer_leave(&mut self) -> bool {
        self.pointer_up()
    }
}
