//! Pending challenges and the countdown-and-draw duel sequence.
//!
//! [`DuelRegistry`] is the bookkeeping half: it owns every live
//! [`Challenge`] and enforces the one-duel-per-player rule. It is a pure
//! state machine (callers pass in the current instant), so the invariants
//! are unit-testable without a platform or a clock.
//!
//! [`DuelResolver`] is the theatrical half: it runs the timed countdown for
//! exactly one pair of players and draws the uniformly random outcome. There
//! is no skill model; the coin is fair by design of the game.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{info, trace};

use crate::clock::Clock;
use crate::configuration::Configuration;
use crate::error::GameError;
use crate::platform::Platform;
use crate::player::{ChannelId, GuildId, PlayerId};

/// A pending, unaccepted duel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    /// Who issued the challenge.
    pub challenger: PlayerId,
    /// Who must `/accept` it.
    pub target: PlayerId,
    /// Guild the challenge was issued in.
    pub guild: GuildId,
    /// Channel the challenge was issued in; `accept` must come from here.
    pub channel: ChannelId,
    /// When it was issued, for expiry.
    pub issued_at: Instant,
}

/// Tracks outstanding challenges and players currently mid-duel.
///
/// Live challenges are keyed by challenger id, which structurally enforces
/// "at most one challenge per challenger"; the target-side rule is checked
/// on insertion. Players whose countdown is running are held in `engaged`
/// so neither can be challenged again before the smoke clears.
pub struct DuelRegistry {
    pending: HashMap<PlayerId, Challenge>,
    engaged: HashSet<PlayerId>,
    ttl: Duration,
}

impl DuelRegistry {
    /// Registry whose pending challenges expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            engaged: HashSet::new(),
            ttl,
        }
    }

    /// Drop challenges older than the ttl. Called lazily from every
    /// operation; nothing monitors them in the background.
    fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.pending.retain(|challenger, challenge| {
            let live = now.duration_since(challenge.issued_at) < ttl;
            if !live {
                trace!(%challenger, "challenge expired");
            }
            live
        });
    }

    /// Register a new challenge.
    ///
    /// Rejects self-challenges, challengers with a live challenge or duel,
    /// and targets that are already spoken for (as target, challenger, or
    /// mid-duel).
    pub fn challenge(
        &mut self,
        challenger: PlayerId,
        target: PlayerId,
        guild: GuildId,
        channel: ChannelId,
        now: Instant,
    ) -> Result<(), GameError> {
        self.prune(now);
        if challenger == target {
            return Err(GameError::SelfChallenge);
        }
        if self.pending.contains_key(&challenger) || self.engaged.contains(&challenger) {
            return Err(GameError::AlreadyChallenging);
        }
        let target_taken = self.engaged.contains(&target)
            || self.pending.contains_key(&target)
            || self.pending.values().any(|c| c.target == target);
        if target_taken {
            return Err(GameError::TargetBusy(target));
        }
        self.pending.insert(
            challenger,
            Challenge {
                challenger,
                target,
                guild,
                channel,
                issued_at: now,
            },
        );
        info!(%challenger, %target, %guild, "challenge issued");
        Ok(())
    }

    /// Find and *remove* the challenge naming `target` in this guild and
    /// channel.
    ///
    /// Removal happens before this returns — before any countdown or other
    /// suspension — so a third party cannot double-accept and the same pair
    /// cannot re-enter concurrently. If the challenger then turns out to be
    /// gone, the challenge is already discarded, which is what we want.
    pub fn accept(
        &mut self,
        target: PlayerId,
        guild: GuildId,
        channel: ChannelId,
        now: Instant,
    ) -> Result<Challenge, GameError> {
        self.prune(now);
        let challenger = self
            .pending
            .iter()
            .find(|(_, c)| c.target == target && c.guild == guild && c.channel == channel)
            .map(|(challenger, _)| *challenger);
        challenger
            .and_then(|challenger| self.pending.remove(&challenger))
            .ok_or(GameError::NoPendingChallenge)
    }

    /// Mark a pair as mid-duel for the duration of the countdown.
    pub fn engage(&mut self, a: PlayerId, b: PlayerId) {
        self.engaged.insert(a);
        self.engaged.insert(b);
    }

    /// Release a pair once their duel has resolved.
    pub fn release(&mut self, a: PlayerId, b: PlayerId) {
        self.engaged.remove(&a);
        self.engaged.remove(&b);
    }

    /// True if this challenger has a live challenge.
    pub fn has_challenge(&self, challenger: PlayerId) -> bool {
        self.pending.contains_key(&challenger)
    }
}

/// Outcome of one resolved duel. Ephemeral: consumed by the stats update
/// and the result announcement, not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelRecord {
    /// Who drew faster.
    pub winner: PlayerId,
    /// Who bit the dust.
    pub loser: PlayerId,
    /// Rendered flavor line describing how it went down.
    pub outcome: String,
}

/// Flavor templates; `{winner}` and `{loser}` are replaced with display
/// names.
const OUTCOME_LINES: [&str; 10] = [
    "{loser} got distracted by a tumbleweed. {winner} wins!",
    "{loser} tried to draw but dropped their revolver!",
    "{winner} was faster than a rattlesnake. {loser} didn't stand a chance.",
    "{loser} sneezed at the wrong moment. {winner} takes the win!",
    "{winner} spun their revolver like a pro. {loser} was too intimidated to shoot straight.",
    "{loser} fumbled with their holster. {winner} didn't waste a second!",
    "{winner} squinted like Clint Eastwood. {loser} couldn't handle the pressure.",
    "A dust cloud blew into {loser}'s eyes! {winner} seized the opportunity!",
    "{loser} got spooked by their own shadow. {winner} remains cool as ice.",
    "{winner} shot with deadly precision. {loser} never saw it coming.",
];

fn render_outcome(template: &str, winner: &str, loser: &str) -> String {
    template.replace("{winner}", winner).replace("{loser}", loser)
}

/// Runs the countdown + random-outcome procedure for one pair of players.
pub struct DuelResolver {
    countdown_from: u32,
    tick: Duration,
    draw_pause: Duration,
}

impl DuelResolver {
    /// Resolver paced by the given configuration.
    pub fn new(config: &Configuration) -> Self {
        Self {
            countdown_from: config.countdown_from,
            tick: config.tick,
            draw_pause: config.draw_pause,
        }
    }

    /// Run the full sequence: post "Get ready...", tick the countdown down
    /// by editing that message, announce the draw, pause, flip a fair coin,
    /// and post the flavor line. The winner/advancement announcement is the
    /// caller's (duel and tournament wordings differ).
    pub fn resolve<P: Platform, R: Rng>(
        &self,
        guild: GuildId,
        channel: ChannelId,
        a: (PlayerId, &str),
        b: (PlayerId, &str),
        platform: &mut P,
        clock: &dyn Clock,
        rng: &mut R,
    ) -> Result<DuelRecord, GameError> {
        let countdown = platform.post(guild, channel, "Get ready...")?;
        for i in (1..=self.countdown_from).rev() {
            platform.edit(countdown, &format!("Get ready... {i}"))?;
            clock.pause(self.tick);
        }
        platform.edit(countdown, "**DRAW!** 🔫")?;
        clock.pause(self.draw_pause);

        let ((winner, winner_name), (loser, loser_name)) =
            if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
        let template = OUTCOME_LINES[rng.gen_range(0..OUTCOME_LINES.len())];
        let outcome = render_outcome(template, winner_name, loser_name);

        info!(%winner, %loser, %guild, "duel resolved");
        platform.post(guild, channel, &format!("💥 {outcome}"))?;

        Ok(DuelRecord {
            winner,
            loser,
            outcome,
        })
    }
}
