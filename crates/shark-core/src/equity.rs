//! Monte-Carlo equity for the Master-versus-Shark matchup.
//!
//! Every trial reshuffles the unseen cards, completes the board from the top
//! of that shuffle and records who won and with which category. The category
//! histogram feeds the side-bet odds in [`crate::odds`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cards::{Card, CardError, DECK_SIZE, ensure_distinct, remaining_deck, shuffle_in_place};
use crate::eval::{HandRank, Side, Winner, duel, seven_cards};
use crate::odds::payout_multiplier;

/// Errors that can occur when setting up a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquityError {
    #[error("board holds at most 5 cards, got {0}")]
    TooManyBoardCards(usize),

    #[error("simulation needs at least one iteration")]
    NoIterations,

    #[error(transparent)]
    Card(#[from] CardError),
}

/// How many trials were won with each hand category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryHistogram {
    counts: [u32; 10],
}

impl CategoryHistogram {
    pub fn record(&mut self, rank: HandRank) {
        self.counts[rank.index()] += 1;
    }

    pub fn count(&self, rank: HandRank) -> u32 {
        self.counts[rank.index()]
    }

    /// Number of recorded trials.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// `(category, count)` pairs, weakest category first.
    pub fn iter(&self) -> impl Iterator<Item = (HandRank, u32)> + '_ {
        HandRank::ALL.iter().map(|rank| (*rank, self.count(*rank)))
    }
}

impl FromIterator<HandRank> for CategoryHistogram {
    fn from_iter<I: IntoIterator<Item = HandRank>>(iter: I) -> Self {
        let mut histogram = CategoryHistogram::default();
        for rank in iter {
            histogram.record(rank);
        }
        histogram
    }
}

/// Outcome frequencies of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    pub master_win: f64,
    pub shark_win: f64,
    pub tie: f64,
    pub iterations: u32,
    /// Winning category of every trial.
    pub histogram: CategoryHistogram,
}

impl EquityResult {
    /// Probability that `side` wins outright.
    pub fn win_probability(&self, side: Side) -> f64 {
        match side {
            Side::Master => self.master_win,
            Side::Shark => self.shark_win,
        }
    }

    /// Quoted main-bet multiplier for `side`, `None` when it never won.
    pub fn multiplier(&self, side: Side) -> Option<f64> {
        payout_multiplier(self.win_probability(side))
    }
}

#[derive(Debug, Default)]
struct Tally {
    master: u32,
    shark: u32,
    tie: u32,
    histogram: CategoryHistogram,
}

/// Estimate win/lose/tie probabilities for two hole-card pairs.
///
/// `board` holds the cards already revealed (0 to 5); the rest are drawn from
/// the unseen deck on every trial.
pub fn simulate_equity<R: Rng + ?Sized>(
    master: [Card; 2],
    shark: [Card; 2],
    board: &[Card],
    iterations: u32,
    rng: &mut R,
) -> Result<EquityResult, EquityError> {
    if board.len() > 5 {
        return Err(EquityError::TooManyBoardCards(board.len()));
    }
    if iterations == 0 {
        return Err(EquityError::NoIterations);
    }

    let mut known = Vec::with_capacity(4 + board.len());
    known.extend_from_slice(&master);
    known.extend_from_slice(&shark);
    known.extend_from_slice(board);
    ensure_distinct(&known)?;

    // Fixed-size buffers keep the trial loop off the heap.
    let unseen = remaining_deck(&known);
    let unseen_len = unseen.len();
    let mut stock = [master[0]; DECK_SIZE];
    stock[..unseen_len].copy_from_slice(&unseen);

    let mut partial = [master[0]; 5];
    partial[..board.len()].copy_from_slice(board);
    let missing = 5 - board.len();

    let mut tally = Tally::default();
    for _ in 0..iterations {
        let mut deck = stock;
        shuffle_in_place(&mut deck[..unseen_len], rng);

        let mut full = partial;
        full[board.len()..].copy_from_slice(&deck[..missing]);

        let (winner, master_hand, shark_hand) =
            duel(&seven_cards(master, &full), &seven_cards(shark, &full));
        let winning = match winner {
            Winner::Master => {
                tally.master += 1;
                master_hand
            }
            Winner::Shark => {
                tally.shark += 1;
                shark_hand
            }
            Winner::Tie => {
                tally.tie += 1;
                master_hand
            }
        };
        tally.histogram.record(winning.rank());
    }

    let total = f64::from(iterations);
    let result = EquityResult {
        master_win: f64::from(tally.master) / total,
        shark_win: f64::from(tally.shark) / total,
        tie: f64::from(tally.tie) / total,
        iterations,
        histogram: tally.histogram,
    };
    debug!(
        iterations,
        master = result.master_win,
        shark = result.shark_win,
        tie = result.tie,
        "equity simulated"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn hole(text: &str) -> [Card; 2] {
        let cards = parse_cards(text).unwrap();
        [cards[0], cards[1]]
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = simulate_equity(hole("As Kd"), hole("7c 7h"), &[], 2_000, &mut rng).unwrap();

        let sum = result.master_win + result.shark_win + result.tie;
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(result.iterations, 2_000);
        assert_eq!(result.histogram.total(), 2_000);
    }

    #[test]
    fn test_full_board_is_deterministic() {
        let board = parse_cards("Ad Kc 7s 2h 9d").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let result = simulate_equity(hole("As Ks"), hole("Qc Qh"), &board, 50, &mut rng).unwrap();

        assert_eq!(result.master_win, 1.0);
        assert_eq!(result.shark_win, 0.0);
        assert_eq!(result.histogram.count(HandRank::TwoPair), 50);
    }

    #[test]
    fn test_tie_records_shared_category() {
        // Broadway on the board: nothing either hole pair adds can improve it.
        let board = parse_cards("Th Jc Qs Kh Ad").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let result = simulate_equity(hole("2s 3h"), hole("2d 3c"), &board, 20, &mut rng).unwrap();

        assert_eq!(result.tie, 1.0);
        assert_eq!(result.histogram.count(HandRank::Straight), 20);
    }

    #[test]
    fn test_overpair_is_favourite() {
        let mut rng = StdRng::seed_from_u64(11);
        let result = simulate_equity(hole("Ah Ad"), hole("7c 2s"), &[], 4_000, &mut rng).unwrap();
        assert!(result.master_win > 0.75, "got {}", result.master_win);
        assert!(result.multiplier(Side::Shark).unwrap() > 4.0);
    }

    #[test]
    fn test_turn_board_one_outer() {
        // Trip fives against trip aces: only the 5♠ on the river saves Master,
        // one card out of the 44 unseen.
        let turn = parse_cards("5h Ah 9s 2c").unwrap();
        let mut rng = StdRng::seed_from_u64(44);
        let result =
            simulate_equity(hole("5c 5d"), hole("Ac Ad"), &turn, 20_000, &mut rng).unwrap();

        let expected = 1.0 / 44.0;
        assert!(
            (result.master_win - expected).abs() < 0.01,
            "got {}",
            result.master_win
        );
        assert_eq!(result.tie, 0.0);
        assert!((result.master_win + result.shark_win - 1.0).abs() < 1e-9);
        // Aces hold as trips, fill up on a 9 or 2, or make quads; no river
        // brings a straight or flush.
        assert_eq!(
            result.histogram.count(HandRank::ThreeOfAKind)
                + result.histogram.count(HandRank::FullHouse)
                + result.histogram.count(HandRank::FourOfAKind),
            20_000
        );
    }

    #[test]
    fn test_seeded_runs_match() {
        let flop = parse_cards("9h Tc 2d").unwrap();
        let a = simulate_equity(
            hole("Jh Qh"),
            hole("9s 9c"),
            &flop,
            500,
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        let b = simulate_equity(
            hole("Jh Qh"),
            hole("9s 9c"),
            &flop,
            500,
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            simulate_equity(hole("As Kd"), hole("As 7h"), &[], 10, &mut rng),
            Err(EquityError::Card(CardError::Duplicate(hole("As Kd")[0])))
        );
        assert_eq!(
            simulate_equity(hole("As Kd"), hole("7c 7h"), &[], 0, &mut rng),
            Err(EquityError::NoIterations)
        );
        let six = parse_cards("2c 3c 4c 5c 6c 8d").unwrap();
        assert_eq!(
            simulate_equity(hole("As Kd"), hole("7c 7h"), &six, 10, &mut rng),
            Err(EquityError::TooManyBoardCards(6))
        );
    }

    #[test]
    fn test_histogram_from_iter() {
        let histogram: CategoryHistogram =
            [HandRank::Pair, HandRank::Pair, HandRank::Flush].into_iter().collect();
        assert_eq!(histogram.count(HandRank::Pair), 2);
        assert_eq!(histogram.count(HandRank::Flush), 1);
        assert_eq!(histogram.total(), 3);
    }
}
