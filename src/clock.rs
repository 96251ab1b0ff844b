//! Time source for the countdown-and-draw sequences.
//!
//! The duel countdown and the pauses between tournament matches are
//! long-running multi-step sequences: each step posts or edits a message,
//! then waits. Routing every wait through [`Clock`] keeps the steps explicit
//! and lets tests drive the whole sequence instantly.

use std::time::{Duration, Instant};

/// Time source and pacing used by the duel and tournament drivers.
pub trait Clock {
    /// Current instant, used to timestamp and expire pending challenges.
    fn now(&self) -> Instant;

    /// Block for the given duration between presentation steps.
    fn pause(&self, duration: Duration);
}

/// Wall clock backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
