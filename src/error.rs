//! Error taxonomy for game commands.
//!
//! Every variant carries its user-visible message in its `Display` impl, so
//! the command dispatcher can reply with `err.to_string()` directly. Errors
//! are local to the invoking command; nothing here poisons state in another
//! guild.

use thiserror::Error;

use crate::player::{ChannelId, PlayerId};

/// Persistence read/write failure from a stats or settings backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage read/write failed: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file held something that is not the expected JSON.
    #[error("stored data is not valid JSON: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Why a game command was rejected.
///
/// Validation and conflict variants are rejected synchronously with no state
/// change. [`GameError::ChallengerGone`] additionally discards the stale
/// challenge it was raised for. [`GameError::Storage`] is logged by the
/// engine and reported, but in-memory game state is not rolled back (stats
/// may under-count on a storage failure; the duel itself already happened).
#[derive(Debug, Error)]
pub enum GameError {
    /// A player tried to duel themselves.
    #[error("You can't duel yourself, partner! Find another gunslinger.")]
    SelfChallenge,
    /// The challenged account is a bot.
    #[error("You can't duel a bot! They're too fast for you.")]
    BotTarget,
    /// The challenger already has a live challenge or duel.
    #[error("You're already in a duel! Finish that one first.")]
    AlreadyChallenging,
    /// The target is already named by a live challenge or duel.
    #[error("<@{0}> is already in a duel! Wait your turn.")]
    TargetBusy(PlayerId),
    /// `accept` found no challenge naming this player in this channel.
    #[error("There's no duel waiting for you to accept in this channel!")]
    NoPendingChallenge,
    /// The challenger left the guild before the duel started.
    #[error("The challenger seems to have left the server! Duel cancelled.")]
    ChallengerGone,
    /// A tournament is already running in this guild.
    #[error("A tournament is already in progress! Wait for the next one.")]
    TournamentRunning,
    /// The player is already on the tournament roster.
    #[error("You're already registered for the tournament!")]
    AlreadyJoined,
    /// Fewer than two players on the roster.
    #[error("Not enough participants! At least 2 players are needed.")]
    NotEnoughPlayers,
    /// Stats were requested for a player with no recorded duels.
    #[error("{0} hasn't participated in any duels yet!")]
    NoStats(String),
    /// The leaderboard was requested before any duel was recorded.
    #[error("No duels have been recorded yet!")]
    EmptyLeaderboard,
    /// Game commands are restricted to another channel in this guild.
    #[error("This command can only be used in <#{0}>!")]
    ChannelRestricted(ChannelId),
    /// The command requires the caller-supplied admin flag.
    #[error("Only an admin can do that, partner.")]
    AdminOnly,
    /// A stats or settings backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The chat platform rejected a post or edit.
    #[error("the chat platform rejected a message: {0}")]
    Platform(#[from] anyhow::Error),
}
