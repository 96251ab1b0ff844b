//! Config for the engine behaviors
//!
//! This module provides configuration options for pacing, presentation, and
//! logging. A configuration can be created programmatically using
//! [`Configuration::new()`] or by reading environment variables using
//! [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables override configuration values. All
//! are optional. Flags are case-insensitive; set to `"true"` to enable.
//!
//! - `SHOWDOWN_LOG` — Enable logging to a file (default: `false`)
//! - `SHOWDOWN_COUNTDOWN` — Countdown start value (default: `3`)
//! - `SHOWDOWN_LEADERBOARD_LIMIT` — Leaderboard size (default: `10`)
//! - `SHOWDOWN_CHALLENGE_TTL_SECS` — Seconds before a pending challenge
//!   expires (default: `300`)
//! - `SHOWDOWN_RNG_SEED` — Fix the RNG seed (default: unset, seeded from
//!   entropy)

use std::time::Duration;

/// Configuration for engine behaviors.
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub(crate) log: bool,
    pub(crate) countdown_from: u32,
    pub(crate) tick: Duration,
    pub(crate) draw_pause: Duration,
    pub(crate) match_pause: Duration,
    pub(crate) round_pause: Duration,
    pub(crate) leaderboard_limit: usize,
    pub(crate) challenge_ttl: Duration,
    pub(crate) rng_seed: Option<u64>,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Logging to file is disabled.
    /// - The countdown runs 3, 2, 1 with one second between ticks.
    /// - "DRAW!" hangs for 1.5 seconds before the outcome.
    /// - Tournaments pause 2 seconds between matches and 1 second after a
    ///   round announcement.
    /// - The leaderboard shows the top 10 players.
    /// - Pending challenges expire after 5 minutes.
    /// - The RNG is seeded from entropy.
    pub fn new() -> Self {
        Self {
            log: false,
            countdown_from: 3,
            tick: Duration::from_secs(1),
            draw_pause: Duration::from_millis(1500),
            match_pause: Duration::from_secs(2),
            round_pause: Duration::from_secs(1),
            leaderboard_limit: 10,
            challenge_ttl: Duration::from_secs(300),
            rng_seed: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the recognized variables. Any other
    /// value (including unset) falls back to the default for that field.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }
        fn get_env_u64(var: &str) -> Option<u64> {
            std::env::var(var).ok().and_then(|val| val.parse().ok())
        }

        let defaults = Self::new();
        Self {
            log: get_env_flag("SHOWDOWN_LOG", false),
            countdown_from: get_env_u64("SHOWDOWN_COUNTDOWN")
                .map(|n| n as u32)
                .unwrap_or(defaults.countdown_from),
            leaderboard_limit: get_env_u64("SHOWDOWN_LEADERBOARD_LIMIT")
                .map(|n| n as usize)
                .unwrap_or(defaults.leaderboard_limit),
            challenge_ttl: get_env_u64("SHOWDOWN_CHALLENGE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.challenge_ttl),
            rng_seed: get_env_u64("SHOWDOWN_RNG_SEED"),
            ..defaults
        }
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Set the countdown start value (`3` counts down 3, 2, 1).
    pub fn with_countdown_from(mut self, value: u32) -> Self {
        self.countdown_from = value;
        self
    }

    /// Set the delay between countdown ticks.
    pub fn with_tick(mut self, value: Duration) -> Self {
        self.tick = value;
        self
    }

    /// Set the pause between "DRAW!" and the outcome line.
    pub fn with_draw_pause(mut self, value: Duration) -> Self {
        self.draw_pause = value;
        self
    }

    /// Set the pause between tournament matches.
    pub fn with_match_pause(mut self, value: Duration) -> Self {
        self.match_pause = value;
        self
    }

    /// Set the pause after a round announcement.
    pub fn with_round_pause(mut self, value: Duration) -> Self {
        self.round_pause = value;
        self
    }

    /// Set how many players the leaderboard shows.
    pub fn with_leaderboard_limit(mut self, value: usize) -> Self {
        self.leaderboard_limit = value;
        self
    }

    /// Set how long a pending challenge stays live before expiring.
    pub fn with_challenge_ttl(mut self, value: Duration) -> Self {
        self.challenge_ttl = value;
        self
    }

    /// Fix the RNG seed for reproducible outcomes (tests, replays).
    pub fn with_rng_seed(mut self, value: u64) -> Self {
        self.rng_seed = Some(value);
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
