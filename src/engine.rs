//! Command surface wiring the registry, resolver, scheduler, and stores.
//!
//! [`Showdown`] is what the command dispatcher talks to: one method per
//! slash command, each gated by the channel policy before any state is
//! touched. The engine owns all mutable game state; the platform, the
//! clock, and the two persistence backends are injected, so the whole
//! surface runs under test with in-memory fakes and a no-op clock.
//!
//! # Blocking
//!
//! `accept` and `start_tournament` run their countdown sequences to
//! completion on the calling thread (there is no cancellation once a duel
//! or a round has started). Commands for other guilds are unaffected;
//! commands for the same guild are expected to arrive one at a time from
//! the dispatcher.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, trace, warn};

use crate::bracket::{Bracket, Entrant, Pairing};
use crate::clock::{Clock, SystemClock};
use crate::configuration::Configuration;
use crate::duel::{DuelRecord, DuelRegistry, DuelResolver};
use crate::error::GameError;
use crate::logger::init_logger;
use crate::platform::{name_or_unknown, Platform};
use crate::player::{ChannelId, GuildId, PlayerId};
use crate::settings::{ChannelPolicy, SettingsBackend};
use crate::stats::{title_for, StatsBackend, StatsStore};
use crate::tournament::TournamentScheduler;

/// Where a command came from and who sent it.
#[derive(Debug, Clone, Copy)]
pub struct CommandCtx {
    /// The invoking player.
    pub caller: PlayerId,
    /// The guild (scope) the command was used in.
    pub guild: GuildId,
    /// The channel the command was used in.
    pub channel: ChannelId,
}

/// The game engine: duels, tournaments, stats, and the channel gate.
pub struct Showdown<P: Platform, S: StatsBackend, K: SettingsBackend> {
    platform: P,
    stats: StatsStore<S>,
    policy: ChannelPolicy<K>,
    registry: DuelRegistry,
    tournaments: TournamentScheduler,
    resolver: DuelResolver,
    clock: Box<dyn Clock>,
    rng: StdRng,
    config: Configuration,
}

impl<P: Platform, S: StatsBackend, K: SettingsBackend> Showdown<P, S, K> {
    /// Create an engine over a platform and the two persistence backends.
    pub fn new(platform: P, stats: S, settings: K, config: Configuration) -> Self {
        if config.log {
            init_logger();
        }
        trace!(?config);

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            platform,
            stats: StatsStore::new(stats),
            policy: ChannelPolicy::new(settings),
            registry: DuelRegistry::new(config.challenge_ttl),
            tournaments: TournamentScheduler::new(),
            resolver: DuelResolver::new(&config),
            clock: Box::new(SystemClock),
            rng,
            config,
        }
    }

    /// Replace the wall clock (tests use a clock whose pauses return
    /// immediately).
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Read access to the stats store, for embedding dispatchers that
    /// render their own views.
    pub fn stats_store(&self) -> &StatsStore<S> {
        &self.stats
    }

    /// The platform adapter the engine was built over.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the platform adapter.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// `/duel` — challenge another player.
    pub fn challenge(&mut self, ctx: CommandCtx, target: PlayerId) -> Result<(), GameError> {
        self.policy.check(ctx.guild, ctx.channel)?;
        if self.platform.is_bot(target) {
            return Err(GameError::BotTarget);
        }
        self.registry
            .challenge(ctx.caller, target, ctx.guild, ctx.channel, self.clock.now())?;
        self.platform.post(
            ctx.guild,
            ctx.channel,
            &format!(
                "🤠 <@{challenger}> has challenged <@{target}> to a QuickDraw duel!\n\
                 <@{target}>, type `/accept` to accept the challenge!",
                challenger = ctx.caller,
            ),
        )?;
        Ok(())
    }

    /// `/accept` — accept the challenge naming the caller in this channel
    /// and run the duel to completion.
    ///
    /// The matched challenge is removed before the countdown starts, so a
    /// second `/accept` (from anyone) finds nothing. A storage failure
    /// while recording the result is reported, but the duel stands: the
    /// outcome was already announced and in-memory state is not rolled
    /// back.
    pub fn accept(&mut self, ctx: CommandCtx) -> Result<DuelRecord, GameError> {
        self.policy.check(ctx.guild, ctx.channel)?;
        let challenge =
            self.registry
                .accept(ctx.caller, ctx.guild, ctx.channel, self.clock.now())?;

        let challenger = challenge.challenger;
        if !self.platform.is_member(ctx.guild, challenger) {
            // the challenge was already discarded by `accept`
            warn!(%challenger, guild = %ctx.guild, "challenger left before the duel");
            return Err(GameError::ChallengerGone);
        }

        self.platform.post(
            ctx.guild,
            ctx.channel,
            &format!(
                "🔫 <@{target}> has accepted <@{challenger}>'s challenge! \
                 The duel will begin shortly...",
                target = ctx.caller,
            ),
        )?;

        let challenger_name = self.name_of(ctx.guild, challenger);
        let target_name = self.name_of(ctx.guild, ctx.caller);

        self.registry.engage(challenger, ctx.caller);
        let record = self.resolver.resolve(
            ctx.guild,
            ctx.channel,
            (challenger, &challenger_name),
            (ctx.caller, &target_name),
            &mut self.platform,
            self.clock.as_ref(),
            &mut self.rng,
        );
        self.registry.release(challenger, ctx.caller);
        let record = record?;
        self.platform.post(
            ctx.guild,
            ctx.channel,
            &format!(
                "🏆 <@{}> wins the duel against <@{}>!",
                record.winner, record.loser
            ),
        )?;

        if let Err(err) = self.stats.record_result(record.winner, record.loser) {
            error!(%err, "stats update failed after duel");
            return Err(err.into());
        }
        Ok(record)
    }

    /// `/join_tournament` — add the caller to this guild's roster.
    pub fn join_tournament(&mut self, ctx: CommandCtx) -> Result<(), GameError> {
        self.policy.check(ctx.guild, ctx.channel)?;
        let count = self.tournaments.join(ctx.guild, ctx.caller)?;
        let name = self.name_of(ctx.guild, ctx.caller);
        let plural = if count == 1 { "" } else { "s" };
        self.platform.post(
            ctx.guild,
            ctx.channel,
            &format!("🎯 {name} has joined the tournament! ({count} participant{plural})"),
        )?;
        Ok(())
    }

    /// `/start_tournament` — seed the bracket from the roster and run every
    /// round to completion. Admin only.
    ///
    /// Returns the champion. Whatever happens, the guild is reset to idle
    /// and the roster cleared before this returns.
    pub fn start_tournament(
        &mut self,
        ctx: CommandCtx,
        is_admin: bool,
    ) -> Result<PlayerId, GameError> {
        self.policy.check(ctx.guild, ctx.channel)?;
        if !is_admin {
            return Err(GameError::AdminOnly);
        }
        let roster = self.tournaments.begin(ctx.guild)?;

        let mut bracket = Bracket::seed(roster, &mut self.rng);
        let outcome = self.announce_lineup(ctx, &bracket).and_then(|()| {
            self.clock.pause(self.config.match_pause);
            self.run_bracket(ctx.guild, ctx.channel, &mut bracket)
        });
        // reset to idle on every exit path, error or not
        self.tournaments.finish(ctx.guild);
        let champion = outcome?;

        let champion_name = self.name_of(ctx.guild, champion);
        self.platform.post(
            ctx.guild,
            ctx.channel,
            &format!(
                "🏆 Tournament Champion 🏆\n\
                 **{champion_name}** is the fastest gunslinger in the West!"
            ),
        )?;
        info!(%champion, guild = %ctx.guild, "tournament champion crowned");
        Ok(champion)
    }

    /// `/stats` — post the dueling stats of the caller or another player.
    pub fn player_stats(
        &mut self,
        ctx: CommandCtx,
        player: Option<PlayerId>,
    ) -> Result<(), GameError> {
        self.policy.check(ctx.guild, ctx.channel)?;
        let subject = player.unwrap_or(ctx.caller);
        let name = self.name_of(ctx.guild, subject);
        let Some(stats) = self.stats.stats(subject)? else {
            return Err(GameError::NoStats(name));
        };
        let title = title_for(stats.wins);
        self.platform.post(
            ctx.guild,
            ctx.channel,
            &format!(
                "🤠 {name}'s Dueling Stats\n\
                 Title: **{title}**\n\
                 Wins: {wins} | Losses: {losses} | Total Duels: {duels}\n\
                 Win Rate: {rate:.1}%",
                wins = stats.wins,
                losses = stats.losses,
                duels = stats.duels,
                rate = stats.win_rate(),
            ),
        )?;
        Ok(())
    }

    /// `/leaderboard` — post the top duelists.
    pub fn leaderboard(&mut self, ctx: CommandCtx) -> Result<(), GameError> {
        self.policy.check(ctx.guild, ctx.channel)?;
        let rows = self.stats.leaderboard(self.config.leaderboard_limit)?;
        if rows.is_empty() {
            return Err(GameError::EmptyLeaderboard);
        }
        let mut text = String::from(
            "🏆 QuickDraw Showdown Leaderboard\nThe fastest gunslingers in the West!\n",
        );
        for (rank, (player, stats)) in rows.iter().enumerate() {
            let name = self.name_of(ctx.guild, *player);
            let title = title_for(stats.wins);
            text.push_str(&format!(
                "{place}. {name} — **{title}** Wins: {wins} | Losses: {losses}\n",
                place = rank + 1,
                wins = stats.wins,
                losses = stats.losses,
            ));
        }
        self.platform.post(ctx.guild, ctx.channel, text.trim_end())?;
        Ok(())
    }

    /// `/set_game_channel` — restrict game commands to one channel, or
    /// clear the restriction with `None`. Admin only.
    ///
    /// Deliberately *not* gated by the channel policy itself: an admin must
    /// be able to fix a restriction pointing at a deleted channel.
    pub fn set_game_channel(
        &mut self,
        ctx: CommandCtx,
        is_admin: bool,
        channel: Option<ChannelId>,
    ) -> Result<(), GameError> {
        if !is_admin {
            return Err(GameError::AdminOnly);
        }
        self.policy.set_restriction(ctx.guild, channel)?;
        let confirmation = match channel {
            Some(channel) => {
                format!("✅ Game commands are now restricted to <#{channel}>.")
            }
            None => "✅ Game commands are now allowed in any channel.".to_owned(),
        };
        self.platform.post(ctx.guild, ctx.channel, &confirmation)?;
        Ok(())
    }

    fn announce_lineup(&mut self, ctx: CommandCtx, bracket: &Bracket) -> Result<(), GameError> {
        let mut lineup = String::from(
            "🏆 QuickDraw Tournament\nThe tournament is about to begin!\nParticipants:\n",
        );
        let mut place = 1;
        for entrant in bracket.entrants() {
            if let Entrant::Player(player) = entrant {
                let name = self.name_of(ctx.guild, *player);
                lineup.push_str(&format!("{place}. {name}\n"));
                place += 1;
            }
        }
        self.platform.post(ctx.guild, ctx.channel, lineup.trim_end())?;
        Ok(())
    }

    /// Drive every round until one player remains.
    ///
    /// Byes advance silently: no duel, no stats write. A storage failure
    /// inside a round is logged and the tournament keeps going — stats may
    /// under-count, but an interrupted bracket would be worse.
    fn run_bracket(
        &mut self,
        guild: GuildId,
        channel: ChannelId,
        bracket: &mut Bracket,
    ) -> Result<PlayerId, GameError> {
        let mut round = 1u32;
        loop {
            self.platform
                .post(guild, channel, &format!("## Round {round}"))?;
            self.clock.pause(self.config.round_pause);

            let mut advancers = Vec::with_capacity(bracket.entrants().len() / 2);
            for (match_num, pairing) in bracket.pairings().into_iter().enumerate() {
                match pairing {
                    Pairing(Entrant::Bye, other) | Pairing(other, Entrant::Bye) => {
                        // walkover, possibly propagating a bye
                        advancers.push(other);
                    }
                    Pairing(Entrant::Player(a), Entrant::Player(b)) => {
                        let winner =
                            self.run_match(guild, channel, round, match_num + 1, a, b)?;
                        advancers.push(Entrant::Player(winner));
                        self.clock.pause(self.config.match_pause);
                    }
                }
            }

            bracket.advance(advancers);
            round += 1;
            if bracket.entrants().len() <= 1 {
                break;
            }
        }

        match bracket.champion() {
            Some(champion) => Ok(champion),
            // a bye never wins a duel, so the last entrant is a player
            None => unreachable!("bracket ended without a champion"),
        }
    }

    fn run_match(
        &mut self,
        guild: GuildId,
        channel: ChannelId,
        round: u32,
        match_num: usize,
        a: PlayerId,
        b: PlayerId,
    ) -> Result<PlayerId, GameError> {
        let a_name = self.name_of(guild, a);
        let b_name = self.name_of(guild, b);
        self.platform.post(
            guild,
            channel,
            &format!("### Match {match_num}: {a_name} vs {b_name}"),
        )?;
        self.clock.pause(self.config.draw_pause);

        let record = self.resolver.resolve(
            guild,
            channel,
            (a, &a_name),
            (b, &b_name),
            &mut self.platform,
            self.clock.as_ref(),
            &mut self.rng,
        )?;
        let winner_name = if record.winner == a { &a_name } else { &b_name };
        self.platform.post(
            guild,
            channel,
            &format!("🏆 {winner_name} advances to the next round!"),
        )?;

        if let Err(err) = self.stats.record_result(record.winner, record.loser) {
            error!(%err, round, match_num, "stats update failed during tournament");
        }
        Ok(record.winner)
    }

    fn name_of(&self, guild: GuildId, player: PlayerId) -> String {
        name_or_unknown(&self.platform, guild, player)
    }
}
