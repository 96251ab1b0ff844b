//! # QuickDraw Showdown
//!
//! A modular Rust crate for running chat-platform quick-draw duels and
//! single-elimination tournaments, with durable win/loss statistics and
//! per-guild channel restrictions.
//!
//! It provides:
//! - Challenge tracking with a one-duel-per-player rule (`DuelRegistry`)
//! - The timed countdown-and-draw sequence with random outcomes
//!   (`DuelResolver`)
//! - Tournament rosters, bye-padded brackets, and round-by-round execution
//!   (`TournamentScheduler`, `Bracket`)
//! - A statistics store with a leaderboard and western rank titles
//!   (`StatsStore`)
//! - The per-guild game-channel gate (`ChannelPolicy`)
//!
//! The chat gateway itself stays outside the crate: the engine only needs
//! the narrow [`Platform`](crate::platform::Platform) contract (post/edit
//! messages, resolve display names), plus a
//! [`Clock`](crate::clock::Clock) for the pauses between countdown ticks.
//! Persistence is two keyed JSON records (stats, settings) behind the
//! [`StatsBackend`](crate::stats::StatsBackend) and
//! [`SettingsBackend`](crate::settings::SettingsBackend) traits.
//!
//! # Documentation Overview
//!
//! - For the command surface, see [`Showdown`](crate::engine::Showdown).
//! - For pacing, expiry, and logging knobs, see
//!   [`Configuration`](crate::configuration::Configuration).
//! - For the duel state machine and invariants, see the [`duel`] module.
//! - For bracket construction and byes, see the [`bracket`] module.
//!
//! # Usage Example
//!
//! ```no_run
//! # struct Gateway;
//! # impl quickdraw::platform::Platform for Gateway {
//! #     fn post(
//! #         &mut self,
//! #         _: quickdraw::player::GuildId,
//! #         _: quickdraw::player::ChannelId,
//! #         _: &str,
//! #     ) -> anyhow::Result<quickdraw::platform::MessageRef> {
//! #         Ok(quickdraw::platform::MessageRef(0))
//! #     }
//! #     fn edit(
//! #         &mut self,
//! #         _: quickdraw::platform::MessageRef,
//! #         _: &str,
//! #     ) -> anyhow::Result<()> {
//! #         Ok(())
//! #     }
//! #     fn display_name(
//! #         &self,
//! #         _: quickdraw::player::GuildId,
//! #         _: quickdraw::player::PlayerId,
//! #     ) -> Option<String> {
//! #         None
//! #     }
//! #     fn is_bot(&self, _: quickdraw::player::PlayerId) -> bool {
//! #         false
//! #     }
//! #     fn is_member(
//! #         &self,
//! #         _: quickdraw::player::GuildId,
//! #         _: quickdraw::player::PlayerId,
//! #     ) -> bool {
//! #         true
//! #     }
//! # }
//! use quickdraw::prelude::*;
//! use quickdraw::settings::JsonFileSettings;
//! use quickdraw::stats::JsonFileStats;
//!
//! fn main() -> Result<(), GameError> {
//!     let config = Configuration::from_env();
//!     let mut engine = Showdown::new(
//!         Gateway, // your gateway adapter implementing `Platform`
//!         JsonFileStats::new("data/stats.json"),
//!         JsonFileSettings::new("data/settings.json"),
//!         config,
//!     );
//!
//!     // the command dispatcher forwards each slash command:
//!     let ctx = CommandCtx {
//!         caller: PlayerId(100),
//!         guild: GuildId(1),
//!         channel: ChannelId(10),
//!     };
//!     engine.challenge(ctx, PlayerId(200))?;
//!
//!     let accept_ctx = CommandCtx {
//!         caller: PlayerId(200),
//!         ..ctx
//!     };
//!     let record = engine.accept(accept_ctx)?;
//!     println!("<@{}> outdrew <@{}>", record.winner, record.loser);
//!     Ok(())
//! }
//! ```
//!
//! Rejections surface as [`GameError`](crate::error::GameError) values whose
//! `Display` is the user-facing reply ("You can't duel yourself, partner!"),
//! so a dispatcher can answer `err.to_string()` verbatim.
#![warn(missing_docs)]

pub use anyhow;

pub mod bracket;
pub mod clock;
pub mod configuration;
pub mod duel;
pub mod engine;
pub mod error;
mod logger;
pub mod platform;
pub mod player;
pub mod settings;
pub mod stats;
pub mod tournament;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use quickdraw::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::configuration::Configuration;
    pub use crate::engine::{CommandCtx, Showdown};
    pub use crate::error::{GameError, StorageError};
    pub use crate::platform::{MessageRef, Platform};
    pub use crate::player::{ChannelId, GuildId, PlayerId};
    pub use crate::stats::PlayerStats;
}
