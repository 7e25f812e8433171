use std::time::Duration;

use crate::animator::{SpriteAnimator, SpriteFrame, SpriteState};
use crate::config::SpriteConfig;

/// Shortest interval the player will tick at.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Drives a [`SpriteAnimator`] from wall-clock deltas.
///
/// Stands in for the single repeating frame timer: time accumulates in
/// `elapsed`, and every pointer transition clears it so the new animation
/// starts a fresh interval.
#[derive(Debug, Clone)]
pub struct SpritePlayer {
    animator: SpriteAnimator,
    elapsed: Duration,
    armed_epoch: u64,
}

impl SpritePlayer {
    pub fn new(config: SpriteConfig) -> Self {
        let animator = SpriteAnimator::new(config);
        let armed_epoch = animator.timer_epoch();
        Self {
            animator,
            elapsed: Duration::ZERO,
            armed_epoch,
        }
    }

    pub fn animator(&self) -> &SpriteAnimator {
        &self.animator
    }

    pub fn state(&self) -> SpriteState {
        self.animator.state()
    }

    pub fn current_frame(&self) -> Option<SpriteFrame> {
        self.animator.current_frame()
    }

    fn interval(&self) -> Duration {
        self.animator.frame_interval().max(MIN_INTERVAL)
    }

    fn rearm(&mut self) {
        self.elapsed = Duration::ZERO;
        self.armed_epoch = self.animator.timer_epoch();
    }

    /// Feed `dt` of elapsed time and run every tick that came due.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, dt: Duration) -> usize {
        if !self.animator.timer_active() {
            self.elapsed = Duration::ZERO;
            return 0;
        }

        let interval = self.interval();
        self.elapsed += dt;
        let mut ticks = 0;
        while self.elapsed >= interval {
            self.elapsed -= interval;
            self.animator.tick();
            ticks += 1;
            // A transition out of a finished animation re-arms in place; the
            // leftover time carries into the new animation.
            self.armed_epoch = self.animator.timer_epoch();
            if !self.animator.timer_active() {
                self.elapsed = Duration::ZERO;
                break;
            }
        }
        ticks
    }

    pub fn pointer_down(&mut self) -> bool {
        let changed = self.animator.pointer_down();
        if changed {
            self.rearm();
        }
        changed
    }

    pub fn pointer_up(&mut self) -> bool {
        let changed = self.animator.pointer_up();
        if changed {
            self.rearm();
        }
        changed
    }

    pub fn pointer_leave(&mut self) -> bool {
        let changed = self.animator.pointer_leave();
        if changed {
            self.rearm();
        }
        changed
    }

    /// Epoch of the animation the timer was last armed for.
    pub fn armed_epoch(&self) -> u64 {
        self.armed_epoch
    }
}
