//! Poker hand evaluation and comparison.
//!
//! [`evaluate`] classifies any 5 to 7 distinct cards into a [`HandStrength`],
//! which carries exactly the ranks needed to break ties inside its category.
//! [`compare`] (also available through `Ord`) orders two strengths, and
//! [`showdown`] runs the whole Master-versus-Shark comparison for one board.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Card, CardError, CardNumber, CardSuit, ensure_distinct};

/// Smallest number of cards [`evaluate`] accepts.
pub const MIN_HAND: usize = 5;
/// Largest number of cards [`evaluate`] accepts.
pub const MAX_HAND: usize = 7;

/// Errors raised by hand evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Evaluation needs between 5 and 7 cards.
    #[error("a hand needs 5 to 7 cards, got {0}")]
    CardCount(usize),

    #[error(transparent)]
    Card(#[from] CardError),
}

/// Represents the ranking of a poker hand, from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// No made hand, only high card.
    HighCard = 0,
    /// Two cards of the same rank.
    Pair = 1,
    /// Two different pairs.
    TwoPair = 2,
    /// Three cards of the same rank.
    ThreeOfAKind = 3,
    /// Five consecutive cards of different suits.
    Straight = 4,
    /// Five cards of the same suit.
    Flush = 5,
    /// Three of a kind plus a pair.
    FullHouse = 6,
    /// Four cards of the same rank.
    FourOfAKind = 7,
    /// Five consecutive cards of the same suit.
    StraightFlush = 8,
    /// A-K-Q-J-T of the same suit.
    RoyalFlush = 9,
}

impl HandRank {
    /// All categories, weakest first.
    pub const ALL: [HandRank; 10] = [
        HandRank::HighCard,
        HandRank::Pair,
        HandRank::TwoPair,
        HandRank::ThreeOfAKind,
        HandRank::Straight,
        HandRank::Flush,
        HandRank::FullHouse,
        HandRank::FourOfAKind,
        HandRank::StraightFlush,
        HandRank::RoyalFlush,
    ];

    /// Category index, 0 (High Card) through 9 (Royal Flush).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<HandRank> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::Pair => "Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
            HandRank::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of a hand: its category plus the ranks that break ties within
/// that category.
///
/// Rank lists are ordered highest first. A wheel (A-2-3-4-5) reports
/// [`CardNumber::Five`] as its high card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum HandStrength {
    HighCard { ranks: [CardNumber; 5] },
    Pair { pair: CardNumber, kickers: [CardNumber; 3] },
    TwoPair { high: CardNumber, low: CardNumber, kicker: CardNumber },
    ThreeOfAKind { trips: CardNumber, kickers: [CardNumber; 2] },
    Straight { high: CardNumber },
    Flush { ranks: [CardNumber; 5] },
    FullHouse { trips: CardNumber, pair: CardNumber },
    FourOfAKind { quads: CardNumber, kicker: CardNumber },
    StraightFlush { high: CardNumber },
    RoyalFlush,
}

impl HandStrength {
    pub fn rank(&self) -> HandRank {
        match self {
            HandStrength::HighCard { .. } => HandRank::HighCard,
            HandStrength::Pair { .. } => HandRank::Pair,
            HandStrength::TwoPair { .. } => HandRank::TwoPair,
            HandStrength::ThreeOfAKind { .. } => HandRank::ThreeOfAKind,
            HandStrength::Straight { .. } => HandRank::Straight,
            HandStrength::Flush { .. } => HandRank::Flush,
            HandStrength::FullHouse { .. } => HandRank::FullHouse,
            HandStrength::FourOfAKind { .. } => HandRank::FourOfAKind,
            HandStrength::StraightFlush { .. } => HandRank::StraightFlush,
            HandStrength::RoyalFlush => HandRank::RoyalFlush,
        }
    }

    /// High card of the straight for the three straight categories.
    pub fn straight_high(&self) -> Option<CardNumber> {
        match self {
            HandStrength::Straight { high } | HandStrength::StraightFlush { high } => Some(*high),
            HandStrength::RoyalFlush => Some(CardNumber::Ace),
            _ => None,
        }
    }

    /// Tie-break values in comparison order, zero padded.
    fn tiebreak(&self) -> [u8; 5] {
        let mut key = [0u8; 5];
        match *self {
            HandStrength::HighCard { ranks } | HandStrength::Flush { ranks } => {
                fill_key(&mut key, &ranks)
            }
            HandStrength::Pair { pair, kickers } => {
                fill_key(&mut key, &[pair, kickers[0], kickers[1], kickers[2]])
            }
            HandStrength::TwoPair { high, low, kicker } => fill_key(&mut key, &[high, low, kicker]),
            HandStrength::ThreeOfAKind { trips, kickers } => {
                fill_key(&mut key, &[trips, kickers[0], kickers[1]])
            }
            HandStrength::FullHouse { trips, pair } => fill_key(&mut key, &[trips, pair]),
            HandStrength::FourOfAKind { quads, kicker } => fill_key(&mut key, &[quads, kicker]),
            HandStrength::Straight { high } | HandStrength::StraightFlush { high } => {
                fill_key(&mut key, &[high])
            }
            HandStrength::RoyalFlush => fill_key(&mut key, &[CardNumber::Ace]),
        }
        key
    }
}

fn fill_key(key: &mut [u8; 5], values: &[CardNumber]) {
    for (slot, value) in key.iter_mut().zip(values) {
        *slot = value.value();
    }
}

impl fmt::Display for HandStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandStrength::HighCard { ranks } => write!(f, "High Card, {} high", ranks[0].symbol()),
            HandStrength::Pair { pair, .. } => write!(f, "Pair of {}s", pair.symbol()),
            HandStrength::TwoPair { high, low, .. } => {
                write!(f, "Two Pair, {}s and {}s", high.symbol(), low.symbol())
            }
            HandStrength::ThreeOfAKind { trips, .. } => {
                write!(f, "Three of a Kind, {}s", trips.symbol())
            }
            HandStrength::Straight { high } => write!(f, "Straight, {} high", high.symbol()),
            HandStrength::Flush { ranks } => write!(f, "Flush, {} high", ranks[0].symbol()),
            HandStrength::FullHouse { trips, pair } => {
                write!(f, "Full House, {}s over {}s", trips.symbol(), pair.symbol())
            }
            HandStrength::FourOfAKind { quads, .. } => {
                write!(f, "Four of a Kind, {}s", quads.symbol())
            }
            HandStrength::StraightFlush { high } => {
                write!(f, "Straight Flush, {} high", high.symbol())
            }
            HandStrength::RoyalFlush => f.write_str("Royal Flush"),
        }
    }
}

/// Order two hand strengths.
///
/// Different categories are decided by category alone; within a category
/// the tie-break ranks are compared element by element.
pub fn compare(a: &HandStrength, b: &HandStrength) -> Ordering {
    a.rank()
        .cmp(&b.rank())
        .then_with(|| a.tiebreak().cmp(&b.tiebreak()))
}

impl PartialOrd for HandStrength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandStrength {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

/// Evaluate 5 to 7 distinct cards.
pub fn evaluate(cards: &[Card]) -> Result<HandStrength, EvalError> {
    if !(MIN_HAND..=MAX_HAND).contains(&cards.len()) {
        return Err(EvalError::CardCount(cards.len()));
    }
    ensure_distinct(cards)?;
    Ok(classify(cards))
}

/// Evaluation without input checks, for callers that already validated.
pub(crate) fn classify(cards: &[Card]) -> HandStrength {
    let counts = rank_counts(cards);

    let flush = flush_suit(cards);
    if let Some(suit) = flush {
        let suited = rank_mask(cards.iter().filter(|c| c.suit() == suit));
        if let Some(high) = straight_high(suited) {
            return if high == CardNumber::Ace {
                HandStrength::RoyalFlush
            } else {
                HandStrength::StraightFlush { high }
            };
        }
    }

    let with_count = |n: u8| descending(&counts).find(|r| counts[usize::from(r.value())] == n);

    if let Some(quads) = with_count(4) {
        let kicker = descending(&counts).find(|r| *r != quads).unwrap_or(quads);
        return HandStrength::FourOfAKind { quads, kicker };
    }

    if let Some(trips) = with_count(3) {
        let pair = descending(&counts)
            .find(|r| *r != trips && counts[usize::from(r.value())] >= 2);
        if let Some(pair) = pair {
            return HandStrength::FullHouse { trips, pair };
        }
    }

    if let Some(suit) = flush {
        let mut suited: Vec<CardNumber> = cards
            .iter()
            .filter(|c| c.suit() == suit)
            .map(Card::number)
            .collect();
        suited.sort_by(|a, b| b.cmp(a));
        return HandStrength::Flush {
            ranks: take_ranks(suited.into_iter()),
        };
    }

    if let Some(high) = straight_high(rank_mask(cards.iter())) {
        return HandStrength::Straight { high };
    }

    if let Some(trips) = with_count(3) {
        return HandStrength::ThreeOfAKind {
            trips,
            kickers: take_ranks(descending(&counts).filter(|r| *r != trips)),
        };
    }

    let mut pairs = descending(&counts).filter(|r| counts[usize::from(r.value())] == 2);
    match (pairs.next(), pairs.next()) {
        (Some(high), Some(low)) => {
            let kicker = descending(&counts)
                .find(|r| *r != high && *r != low)
                .unwrap_or(low);
            HandStrength::TwoPair { high, low, kicker }
        }
        (Some(pair), None) => HandStrength::Pair {
            pair,
            kickers: take_ranks(descending(&counts).filter(|r| *r != pair)),
        },
        _ => HandStrength::HighCard {
            ranks: take_ranks(descending(&counts)),
        },
    }
}

/// Cards per rank, indexed by rank value (slots 0 and 1 unused).
fn rank_counts(cards: &[Card]) -> [u8; 15] {
    let mut counts = [0u8; 15];
    for card in cards {
        counts[usize::from(card.number().value())] += 1;
    }
    counts
}

/// Ranks present in `counts`, highest first.
fn descending(counts: &[u8; 15]) -> impl Iterator<Item = CardNumber> + '_ {
    CardNumber::ALL
        .iter()
        .rev()
        .copied()
        .filter(|r| counts[usize::from(r.value())] > 0)
}

fn take_ranks<const N: usize>(ranks: impl Iterator<Item = CardNumber>) -> [CardNumber; N] {
    let mut out = [CardNumber::Two; N];
    for (slot, rank) in out.iter_mut().zip(ranks) {
        *slot = rank;
    }
    out
}

/// The suit holding five or more of `cards`, if any.
pub(crate) fn flush_suit(cards: &[Card]) -> Option<CardSuit> {
    let mut counts = [0u8; 4];
    for card in cards {
        counts[card.suit().index()] += 1;
    }
    CardSuit::ALL.into_iter().find(|s| counts[s.index()] >= 5)
}

/// Bit `v` set for every rank value `v` present.
fn rank_mask<'a>(cards: impl Iterator<Item = &'a Card>) -> u16 {
    cards.fold(0, |mask, card| mask | 1u16 << card.number().value())
}

/// Straight high card for the ranks in `mask`. Broadway is tested first,
/// then the wheel (reported as Five), then every lower run, highest first.
fn straight_high(mask: u16) -> Option<CardNumber> {
    const RUN: u16 = 0b11111;
    const WHEEL: u16 = 1 << 14 | 1 << 5 | 1 << 4 | 1 << 3 | 1 << 2;
    let has_run = |high: u8| {
        let run = RUN << (high - 4);
        mask & run == run
    };
    if has_run(14) {
        return Some(CardNumber::Ace);
    }
    if mask & WHEEL == WHEEL {
        return Some(CardNumber::Five);
    }
    (6..=13u8)
        .rev()
        .find(|high| has_run(*high))
        .and_then(CardNumber::from_value)
}

/// Ranks making up the straight that tops out at `high`, highest first.
pub(crate) fn straight_ranks(high: CardNumber) -> [CardNumber; 5] {
    if high == CardNumber::Five {
        return [
            CardNumber::Five,
            CardNumber::Four,
            CardNumber::Three,
            CardNumber::Two,
            CardNumber::Ace,
        ];
    }
    let mut ranks = [high; 5];
    for (offset, slot) in ranks.iter_mut().enumerate() {
        *slot = CardNumber::from_value(high.value() - offset as u8).unwrap_or(high);
    }
    ranks
}

/// One of the two competing hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Master,
    Shark,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Master => "Master",
            Side::Shark => "Shark",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Master,
    Shark,
    Tie,
}

impl Winner {
    pub fn side(self) -> Option<Side> {
        match self {
            Winner::Master => Some(Side::Master),
            Winner::Shark => Some(Side::Shark),
            Winner::Tie => None,
        }
    }

    fn from_ordering(order: Ordering) -> Winner {
        match order {
            Ordering::Greater => Winner::Master,
            Ordering::Less => Winner::Shark,
            Ordering::Equal => Winner::Tie,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Master => f.write_str("Master"),
            Winner::Shark => f.write_str("Shark"),
            Winner::Tie => f.write_str("Tie"),
        }
    }
}

/// Both final hands of a round and who took it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showdown {
    pub master: HandStrength,
    pub shark: HandStrength,
    pub winner: Winner,
}

impl Showdown {
    /// The winning side's hand; on a tie both hands share a category, so
    /// Master's is reported.
    pub fn winning_hand(&self) -> &HandStrength {
        match self.winner {
            Winner::Shark => &self.shark,
            Winner::Master | Winner::Tie => &self.master,
        }
    }
}

/// Hole cards followed by the board, the layout used for winning-card indices.
pub fn seven_cards(hole: [Card; 2], board: &[Card; 5]) -> [Card; 7] {
    [hole[0], hole[1], board[0], board[1], board[2], board[3], board[4]]
}

/// Evaluate and compare Master's and Shark's hands on `board` (3 to 5 cards).
pub fn showdown(master: [Card; 2], shark: [Card; 2], board: &[Card]) -> Result<Showdown, EvalError> {
    let mut all = Vec::with_capacity(4 + board.len());
    all.extend_from_slice(&master);
    all.extend_from_slice(&shark);
    all.extend_from_slice(board);
    ensure_distinct(&all)?;

    let master_cards: Vec<Card> = master.iter().chain(board).copied().collect();
    let shark_cards: Vec<Card> = shark.iter().chain(board).copied().collect();
    let master = evaluate(&master_cards)?;
    let shark = evaluate(&shark_cards)?;
    Ok(Showdown {
        master,
        shark,
        winner: Winner::from_ordering(compare(&master, &shark)),
    })
}

/// Compare two already-validated 7-card hands.
pub(crate) fn duel(master: &[Card; 7], shark: &[Card; 7]) -> (Winner, HandStrength, HandStrength) {
    let master = classify(master);
    let shark = classify(shark);
    (Winner::from_ordering(compare(&master, &shark)), master, shark)
}
