//! Per-guild tournament lifecycle: roster collection and the running flag.
//!
//! State machine per guild: `Idle -> Open (players joining) -> Running ->
//! Idle`. Exactly one tournament may run per guild at a time, and the roster
//! is only mutable while none is running. The bracket itself lives in
//! [`crate::bracket`]; driving the rounds is the engine's job.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::error::GameError;
use crate::player::{GuildId, PlayerId};

/// Rosters and running flags for every guild, owned by the engine so no
/// process-global state is involved.
#[derive(Debug, Default)]
pub struct TournamentScheduler {
    rosters: HashMap<GuildId, Vec<PlayerId>>,
    running: HashSet<GuildId>,
}

impl TournamentScheduler {
    /// Empty scheduler: every guild idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player to the guild's roster.
    ///
    /// Returns the new roster size for the join announcement. Rejected while
    /// a tournament is running or if the player already joined.
    pub fn join(&mut self, scope: GuildId, player: PlayerId) -> Result<usize, GameError> {
        if self.running.contains(&scope) {
            return Err(GameError::TournamentRunning);
        }
        let roster = self.rosters.entry(scope).or_default();
        if roster.contains(&player) {
            return Err(GameError::AlreadyJoined);
        }
        roster.push(player);
        info!(%scope, %player, participants = roster.len(), "player joined tournament");
        Ok(roster.len())
    }

    /// Flip the guild to Running and hand out the roster for seeding.
    ///
    /// Rejected when fewer than two players joined or a tournament is
    /// already running. The roster stays owned here until [`Self::finish`].
    pub fn begin(&mut self, scope: GuildId) -> Result<Vec<PlayerId>, GameError> {
        if self.running.contains(&scope) {
            return Err(GameError::TournamentRunning);
        }
        let roster = self.rosters.get(&scope).cloned().unwrap_or_default();
        if roster.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        self.running.insert(scope);
        info!(%scope, participants = roster.len(), "tournament started");
        Ok(roster)
    }

    /// Back to Idle: clear the roster and the running flag. Runs on
    /// completion and on the abort path alike.
    pub fn finish(&mut self, scope: GuildId) {
        self.running.remove(&scope);
        self.rosters.remove(&scope);
        info!(%scope, "tournament finished");
    }

    /// True while a tournament is running in this guild.
    pub fn is_running(&self, scope: GuildId) -> bool {
        self.running.contains(&scope)
    }
}

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    const GUILD: GuildId = GuildId(1);

    #[test]
    fn join_rejects_duplicates() {
        let mut sched = TournamentScheduler::new();
        assert_eq!(sched.join(GUILD, PlayerId(1)).unwrap(), 1);
        assert_eq!(sched.join(GUILD, PlayerId(2)).unwrap(), 2);
        assert!(matches!(
            sched.join(GUILD, PlayerId(1)),
            Err(GameError::AlreadyJoined)
        ));
    }

    #[test]
    fn begin_needs_at_least_two_players() {
        let mut sched = TournamentScheduler::new();
        assert!(matches!(
            sched.begin(GUILD),
            Err(GameError::NotEnoughPlayers)
        ));
        sched.join(GUILD, PlayerId(1)).unwrap();
        assert!(matches!(
            sched.begin(GUILD),
            Err(GameError::NotEnoughPlayers)
        ));
        sched.join(GUILD, PlayerId(2)).unwrap();
        assert_eq!(sched.begin(GUILD).unwrap().len(), 2);
    }

    #[test]
    fn running_blocks_join_and_begin_until_finish() {
        let mut sched = TournamentScheduler::new();
        sched.join(GUILD, PlayerId(1)).unwrap();
        sched.join(GUILD, PlayerId(2)).unwrap();
        sched.begin(GUILD).unwrap();
        assert!(sched.is_running(GUILD));
        assert!(matches!(
            sched.join(GUILD, PlayerId(3)),
            Err(GameError::TournamentRunning)
        ));
        assert!(matches!(
            sched.begin(GUILD),
            Err(GameError::TournamentRunning)
        ));

        sched.finish(GUILD);
        assert!(!sched.is_running(GUILD));
        // roster was cleared, joining starts a fresh one
        assert_eq!(sched.join(GUILD, PlayerId(1)).unwrap(), 1);
    }

    #[test]
    fn guilds_are_independent() {
        let mut sched = TournamentScheduler::new();
        sched.join(GUILD, PlayerId(1)).unwrap();
        sched.join(GUILD, PlayerId(2)).unwrap();
        sched.begin(GUILD).unwrap();
        // another guild can collect and start its own
        sched.join(GuildId(2), PlayerId(1)).unwrap();
        assert!(!sched.is_running(GuildId(2)));
    }
}
