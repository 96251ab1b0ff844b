//! Seam between the engine and the chat platform.
//!
//! The gateway connection, slash-command parsing, and embed rendering all
//! live outside this crate. The engine only needs to post and edit plain
//! text messages and to resolve user ids, so that is the whole contract.
//! Implement [`Platform`] once against the real gateway and once in-memory
//! for tests.

use crate::player::{ChannelId, GuildId, PlayerId};

/// Opaque reference to a posted message, used for later edits
/// (the countdown ticks are edits of a single message).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef(pub u64);

/// What the chat platform must provide to the engine.
///
/// `post` and `edit` return `anyhow::Result` so adapters can surface
/// whatever error type their gateway client uses; the engine wraps it into
/// [`GameError::Platform`](crate::error::GameError::Platform).
pub trait Platform {
    /// Post a message to a channel and return a handle for later edits.
    fn post(
        &mut self,
        scope: GuildId,
        channel: ChannelId,
        content: &str,
    ) -> anyhow::Result<MessageRef>;

    /// Replace the content of a previously posted message.
    fn edit(&mut self, message: MessageRef, content: &str) -> anyhow::Result<()>;

    /// Resolve a player's display name within a guild.
    ///
    /// `None` means the id no longer resolves there (the member left or was
    /// never known); callers fall back to an "Unknown Gunslinger" placeholder.
    fn display_name(&self, scope: GuildId, player: PlayerId) -> Option<String>;

    /// True if the id belongs to a bot account. Bots cannot duel.
    fn is_bot(&self, player: PlayerId) -> bool;

    /// True if the player is currently a member of the guild.
    fn is_member(&self, scope: GuildId, player: PlayerId) -> bool;
}

/// Display name with the placeholder fallback for ids that no longer resolve.
pub fn name_or_unknown<P: Platform>(platform: &P, scope: GuildId, player: PlayerId) -> String {
    platform
        .display_name(scope, player)
        .unwrap_or_else(|| format!("Unknown Gunslinger ({player})"))
}
