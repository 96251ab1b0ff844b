//! Single-elimination bracket seeding and advancement.
//!
//! Seeded once from a shuffled roster, padded with byes to the next power of
//! two, then advanced round by round by pairing survivors in order. No
//! re-shuffle happens between rounds, so bye advancement preserves the
//! original pairing order.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::player::PlayerId;

/// One side of a pairing: a real player, or a bye placeholder that loses by
/// walkover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entrant {
    /// A seeded player.
    Player(PlayerId),
    /// Synthetic opponent; the other side advances without a duel.
    Bye,
}

/// Two consecutive bracket entrants facing each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing(pub Entrant, pub Entrant);

/// The bracket: round count fixed at seeding, plus the current round's
/// entrants in bracket order.
#[derive(Debug, Clone)]
pub struct Bracket {
    rounds: u32,
    entrants: Vec<Entrant>,
}

impl Bracket {
    /// Shuffle the roster uniformly, compute `ceil(log2(n))` rounds, and pad
    /// with byes up to the bracket size.
    ///
    /// Callers must hand in at least two players; a roster of one is
    /// rejected upstream as `NotEnoughPlayers`.
    pub fn seed<R: Rng>(mut roster: Vec<PlayerId>, rng: &mut R) -> Self {
        roster.shuffle(rng);
        let n = roster.len();
        let rounds = f64::log2(n as f64).ceil() as u32;
        let size = 1usize << rounds;
        let mut entrants: Vec<Entrant> = roster.into_iter().map(Entrant::Player).collect();
        entrants.resize(size, Entrant::Bye);
        Bracket { rounds, entrants }
    }

    /// Total number of rounds this bracket will run.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// The current round's entrants in bracket order.
    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    /// The current round's matches: consecutive entrants paired in order.
    pub fn pairings(&self) -> Vec<Pairing> {
        self.entrants
            .chunks_exact(2)
            .map(|pair| Pairing(pair[0], pair[1]))
            .collect()
    }

    /// Install the advancers as the next round, in the order they advanced.
    pub fn advance(&mut self, advancers: Vec<Entrant>) {
        self.entrants = advancers;
    }

    /// The champion, once exactly one player remains.
    pub fn champion(&self) -> Option<PlayerId> {
        match self.entrants[..] {
            [Entrant::Player(player)] => Some(player),
            _ => None,
        }
    }
}

#[cfg(test)]
mod bracket_tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn players(n: u64) -> Vec<PlayerId> {
        (1..=n).map(PlayerId).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn round_count_is_ceil_log2() {
        for (n, expected) in [(2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4)] {
            let bracket = Bracket::seed(players(n), &mut rng());
            assert_eq!(bracket.rounds(), expected, "n = {n}");
        }
    }

    #[test]
    fn byes_pad_to_the_next_power_of_two() {
        for n in 2..=9u64 {
            let bracket = Bracket::seed(players(n), &mut rng());
            let size = 1usize << bracket.rounds();
            assert_eq!(bracket.entrants().len(), size);
            let byes = bracket
                .entrants()
                .iter()
                .filter(|e| matches!(e, Entrant::Bye))
                .count();
            assert_eq!(byes, size - n as usize, "n = {n}");
        }
    }

    #[test]
    fn seeding_keeps_every_player_exactly_once() {
        let bracket = Bracket::seed(players(5), &mut rng());
        let mut seeded: Vec<u64> = bracket
            .entrants()
            .iter()
            .filter_map(|e| match e {
                Entrant::Player(PlayerId(id)) => Some(*id),
                Entrant::Bye => None,
            })
            .collect();
        seeded.sort_unstable();
        assert_eq!(seeded, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn pairings_take_consecutive_entrants() {
        let mut bracket = Bracket::seed(players(4), &mut rng());
        let pairings = bracket.pairings();
        assert_eq!(pairings.len(), 2);
        assert_eq!(pairings[0].0, bracket.entrants()[0]);
        assert_eq!(pairings[0].1, bracket.entrants()[1]);

        bracket.advance(vec![pairings[0].0, pairings[1].0]);
        assert_eq!(bracket.pairings().len(), 1);
    }

    #[test]
    fn champion_only_when_one_player_remains() {
        let mut bracket = Bracket::seed(players(2), &mut rng());
        assert_eq!(bracket.champion(), None);
        bracket.advance(vec![Entrant::Player(PlayerId(2))]);
        assert_eq!(bracket.champion(), Some(PlayerId(2)));
    }
}
