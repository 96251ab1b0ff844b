//! Durable win/loss bookkeeping, the leaderboard, and rank titles.
//!
//! The store is the sole writer of player stats; the duel and tournament
//! drivers only request mutations through [`StatsStore::record_result`]. The
//! backing file format is a JSON map from player id to `{wins, losses,
//! duels}`, keyed by the numeric id rendered as a string, so an existing
//! `data/stats.json` keeps working unchanged.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::StorageError;
use crate::player::PlayerId;

/// Cumulative duel record of one player.
///
/// `duels == wins + losses` always holds; there is deliberately no decrement
/// operation anywhere in this module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Duels won.
    pub wins: u32,
    /// Duels lost.
    pub losses: u32,
    /// Total duels fought.
    pub duels: u32,
}

impl PlayerStats {
    /// Percentage of duels won, `0.0` for a player with no duels.
    pub fn win_rate(&self) -> f64 {
        if self.duels == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.duels) * 100.0
        }
    }
}

/// Durable key-value mapping behind the store.
///
/// Read-modify-write cycles are serialized by [`StatsStore`]; a backend only
/// has to load and save the whole table.
pub trait StatsBackend {
    /// Load the full stats table. A backend with nothing stored yet returns
    /// an empty map, not an error.
    fn load(&self) -> Result<HashMap<PlayerId, PlayerStats>, StorageError>;

    /// Replace the stored table.
    fn save(&mut self, table: &HashMap<PlayerId, PlayerStats>) -> Result<(), StorageError>;
}

/// Stats persisted to a JSON file, compatible with the historical
/// `data/stats.json` layout.
#[derive(Debug)]
pub struct JsonFileStats {
    path: PathBuf,
}

impl JsonFileStats {
    /// Use (or create on first save) the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatsBackend for JsonFileStats {
    fn load(&self) -> Result<HashMap<PlayerId, PlayerStats>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&mut self, table: &HashMap<PlayerId, PlayerStats>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(table)?;
        // write-then-rename so a crash mid-save never truncates the table
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory backend for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStats {
    table: HashMap<PlayerId, PlayerStats>,
}

impl StatsBackend for MemoryStats {
    fn load(&self) -> Result<HashMap<PlayerId, PlayerStats>, StorageError> {
        Ok(self.table.clone())
    }

    fn save(&mut self, table: &HashMap<PlayerId, PlayerStats>) -> Result<(), StorageError> {
        self.table = table.clone();
        Ok(())
    }
}

/// The statistics store: sole writer of [`PlayerStats`].
///
/// The backend mutex serializes every read-increment-write cycle, so two
/// duels naming the same player (e.g. simultaneous tournaments in different
/// guilds) cannot lose an update.
pub struct StatsStore<B: StatsBackend> {
    backend: Mutex<B>,
}

impl<B: StatsBackend> StatsStore<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    /// Record one finished duel: winner gains a win, loser a loss, both a
    /// duel, in a single atomic unit. Calling twice counts two duels.
    ///
    /// On failure nothing partial becomes visible; the table is saved as a
    /// whole or not at all.
    pub fn record_result(&self, winner: PlayerId, loser: PlayerId) -> Result<(), StorageError> {
        let mut backend = self.backend.lock().expect("poisoned");
        let mut table = backend.load()?;
        {
            let entry = table.entry(winner).or_default();
            entry.wins += 1;
            entry.duels += 1;
        }
        {
            let entry = table.entry(loser).or_default();
            entry.losses += 1;
            entry.duels += 1;
        }
        trace!(%winner, %loser, "recording duel result");
        backend.save(&table)
    }

    /// Stats for one player, `None` if they never dueled.
    pub fn stats(&self, player: PlayerId) -> Result<Option<PlayerStats>, StorageError> {
        let backend = self.backend.lock().expect("poisoned");
        Ok(backend.load()?.get(&player).copied())
    }

    /// Top `limit` players: wins descending, then fewer losses first, then
    /// by id so that ties come out in a stable order.
    pub fn leaderboard(
        &self,
        limit: usize,
    ) -> Result<Vec<(PlayerId, PlayerStats)>, StorageError> {
        let backend = self.backend.lock().expect("poisoned");
        let mut rows: Vec<_> = backend.load()?.into_iter().collect();
        rows.sort_by(|a, b| {
            b.1.wins
                .cmp(&a.1.wins)
                .then(a.1.losses.cmp(&b.1.losses))
                .then(a.0.cmp(&b.0))
        });
        rows.truncate(limit);
        Ok(rows)
    }
}

/// Win thresholds and the rank earned at each. Sorted ascending.
const TITLES: [(u32, &str); 8] = [
    (0, "Newcomer"),
    (3, "Greenhorn"),
    (5, "Deputy"),
    (10, "Sheriff"),
    (15, "Gunslinger"),
    (20, "Desperado"),
    (30, "Outlaw"),
    (40, "Legend of the West"),
];

/// Rank title for a win count: the highest threshold not exceeding `wins`.
pub fn title_for(wins: u32) -> &'static str {
    let mut title = TITLES[0].1;
    for (threshold, name) in TITLES {
        if wins >= threshold {
            title = name;
        } else {
            break;
        }
    }
    title
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    fn store() -> StatsStore<MemoryStats> {
        StatsStore::new(MemoryStats::default())
    }

    #[test]
    fn duels_always_equal_wins_plus_losses() {
        let store = store();
        let (a, b, c) = (PlayerId(1), PlayerId(2), PlayerId(3));
        store.record_result(a, b).unwrap();
        store.record_result(b, a).unwrap();
        store.record_result(a, c).unwrap();
        store.record_result(c, b).unwrap();
        for player in [a, b, c] {
            let stats = store.stats(player).unwrap().unwrap();
            assert_eq!(stats.duels, stats.wins + stats.losses);
        }
    }

    #[test]
    fn both_players_initialized_on_first_duel() {
        let store = store();
        store.record_result(PlayerId(7), PlayerId(8)).unwrap();
        let winner = store.stats(PlayerId(7)).unwrap().unwrap();
        let loser = store.stats(PlayerId(8)).unwrap().unwrap();
        assert_eq!((winner.wins, winner.losses, winner.duels), (1, 0, 1));
        assert_eq!((loser.wins, loser.losses, loser.duels), (0, 1, 1));
    }

    #[test]
    fn unknown_player_has_no_stats() {
        assert!(store().stats(PlayerId(42)).unwrap().is_none());
    }

    #[test]
    fn two_calls_count_two_duels() {
        let store = store();
        store.record_result(PlayerId(1), PlayerId(2)).unwrap();
        store.record_result(PlayerId(1), PlayerId(2)).unwrap();
        let stats = store.stats(PlayerId(1)).unwrap().unwrap();
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.duels, 2);
    }

    #[test]
    fn leaderboard_orders_by_wins_then_fewest_losses() {
        let store = store();
        let (a, b, c, d, e) = (
            PlayerId(1),
            PlayerId(2),
            PlayerId(3),
            PlayerId(4),
            PlayerId(5),
        );
        store.record_result(a, b).unwrap();
        store.record_result(a, b).unwrap();
        store.record_result(b, c).unwrap();
        store.record_result(d, e).unwrap();
        // a: 2-0, b: 1-2, d: 1-0, c: 0-1, e: 0-1
        let rows = store.leaderboard(10).unwrap();
        let order: Vec<PlayerId> = rows.iter().map(|(id, _)| *id).collect();
        // d outranks b on fewer losses; c/e tie resolves by id
        assert_eq!(order, vec![a, d, b, c, e]);
    }

    #[test]
    fn leaderboard_truncates_to_limit() {
        let store = store();
        for i in 0..8 {
            store.record_result(PlayerId(i), PlayerId(i + 100)).unwrap();
        }
        assert_eq!(store.leaderboard(5).unwrap().len(), 5);
    }

    #[test]
    fn titles_match_threshold_table() {
        assert_eq!(title_for(0), "Newcomer");
        assert_eq!(title_for(2), "Newcomer");
        assert_eq!(title_for(3), "Greenhorn");
        assert_eq!(title_for(4), "Greenhorn");
        assert_eq!(title_for(5), "Deputy");
        assert_eq!(title_for(10), "Sheriff");
        assert_eq!(title_for(14), "Sheriff");
        assert_eq!(title_for(15), "Gunslinger");
        assert_eq!(title_for(20), "Desperado");
        assert_eq!(title_for(39), "Outlaw");
        assert_eq!(title_for(40), "Legend of the West");
        assert_eq!(title_for(1000), "Legend of the West");
    }

    #[test]
    fn win_rate_is_percentage_of_duels() {
        let stats = PlayerStats {
            wins: 1,
            losses: 3,
            duels: 4,
        };
        assert!((stats.win_rate() - 25.0).abs() < f64::EPSILON);
        assert_eq!(PlayerStats::default().win_rate(), 0.0);
    }

    #[test]
    fn json_file_round_trip_and_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "quickdraw_stats_test_{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let store = StatsStore::new(JsonFileStats::new(&path));
        assert!(store.stats(PlayerId(1)).unwrap().is_none()); // missing file is empty

        store.record_result(PlayerId(1), PlayerId(2)).unwrap();
        drop(store);

        // keys must be stringified ids, the historical file layout
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"1\""));

        let reopened = StatsStore::new(JsonFileStats::new(&path));
        assert_eq!(reopened.stats(PlayerId(1)).unwrap().unwrap().wins, 1);
        let _ = fs::remove_file(&path);
    }
}
