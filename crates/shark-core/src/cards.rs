//! Playing cards and the 52-card deck.
//!
//! This module provides the card identity types used by every other part of
//! the engine, plus deck construction and a Fisher–Yates shuffle driven by an
//! injected random source.
//!
//! # Examples
//!
//! ```
//! use shark_core::cards::{Card, CardNumber, CardSuit};
//!
//! let card: Card = "As".parse().unwrap();
//! assert_eq!(card, Card(CardNumber::Ace, CardSuit::Spades));
//! assert_eq!(card.to_string(), "A♠");
//! ```

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// Errors raised when card input breaks the caller contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// The same card appears more than once.
    #[error("duplicate card {0}")]
    Duplicate(Card),

    /// Text could not be read as a card.
    #[error("cannot parse card from {0:?}")]
    Parse(String),
}

/// Represents a card suit (Clubs, Diamonds, Hearts, Spades).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSuit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl CardSuit {
    /// All suits in standard order
    pub const ALL: [CardSuit; 4] = [
        CardSuit::Clubs,
        CardSuit::Diamonds,
        CardSuit::Hearts,
        CardSuit::Spades,
    ];

    /// Returns the suit as a display symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            CardSuit::Clubs => "♣",
            CardSuit::Diamonds => "♦",
            CardSuit::Hearts => "♥",
            CardSuit::Spades => "♠",
        }
    }

    /// Dense index (0-3) used for tallies.
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    fn parse(text: &str) -> Option<CardSuit> {
        match text {
            "c" | "C" | "♣" => Some(CardSuit::Clubs),
            "d" | "D" | "♦" => Some(CardSuit::Diamonds),
            "h" | "H" | "♥" => Some(CardSuit::Hearts),
            "s" | "S" | "♠" => Some(CardSuit::Spades),
            _ => None,
        }
    }
}

/// Represents a card rank (2-14, where 14 = Ace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardNumber {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl CardNumber {
    /// All ranks, lowest first.
    pub const ALL: [CardNumber; 13] = [
        CardNumber::Two,
        CardNumber::Three,
        CardNumber::Four,
        CardNumber::Five,
        CardNumber::Six,
        CardNumber::Seven,
        CardNumber::Eight,
        CardNumber::Nine,
        CardNumber::Ten,
        CardNumber::Jack,
        CardNumber::Queen,
        CardNumber::King,
        CardNumber::Ace,
    ];

    /// Numeric value, Ace high (2..=14).
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Inverse of [`value`](Self::value).
    pub fn from_value(value: u8) -> Option<CardNumber> {
        match value {
            2..=14 => Some(CardNumber::ALL[usize::from(value - 2)]),
            _ => None,
        }
    }

    /// Returns the rank as a display character
    pub fn symbol(&self) -> &'static str {
        match self {
            CardNumber::Two => "2",
            CardNumber::Three => "3",
            CardNumber::Four => "4",
            CardNumber::Five => "5",
            CardNumber::Six => "6",
            CardNumber::Seven => "7",
            CardNumber::Eight => "8",
            CardNumber::Nine => "9",
            CardNumber::Ten => "T",
            CardNumber::Jack => "J",
            CardNumber::Queen => "Q",
            CardNumber::King => "K",
            CardNumber::Ace => "A",
        }
    }

    fn parse(text: &str) -> Option<CardNumber> {
        let number = match text.to_ascii_uppercase().as_str() {
            "T" | "10" => CardNumber::Ten,
            "J" => CardNumber::Jack,
            "Q" => CardNumber::Queen,
            "K" => CardNumber::King,
            "A" => CardNumber::Ace,
            digit => return digit.parse::<u8>().ok().filter(|v| *v < 10).and_then(Self::from_value),
        };
        Some(number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card(pub CardNumber, pub CardSuit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0.symbol(), self.1.symbol())
    }
}

impl Card {
    pub fn number(&self) -> CardNumber {
        self.0
    }

    pub fn suit(&self) -> CardSuit {
        self.1
    }
}

impl FromStr for Card {
    type Err = CardError;

    /// Accepts a rank (`2`-`9`, `10`/`T`, `J`, `Q`, `K`, `A`) followed by a
    /// suit letter or symbol, e.g. `As`, `10h`, `T♥`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let parse_error = || CardError::Parse(s.to_string());
        let (split, _) = text.char_indices().last().ok_or_else(parse_error)?;
        let number = CardNumber::parse(&text[..split]).ok_or_else(parse_error)?;
        let suit = CardSuit::parse(&text[split..]).ok_or_else(parse_error)?;
        Ok(Card(number, suit))
    }
}

/// Parse a whitespace or comma separated list of cards.
pub fn parse_cards(text: &str) -> Result<Vec<Card>, CardError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Fail with the first card that appears twice.
pub fn ensure_distinct(cards: &[Card]) -> Result<(), CardError> {
    let mut seen = [false; DECK_SIZE];
    for card in cards {
        let slot = &mut seen[deck_index(*card)];
        if *slot {
            return Err(CardError::Duplicate(*card));
        }
        *slot = true;
    }
    Ok(())
}

/// Position of `card` in [`full_deck`] order.
fn deck_index(card: Card) -> usize {
    card.suit().index() * 13 + usize::from(card.number().value() - 2)
}

/// All 52 cards, suit-major, ranks ascending within each suit.
pub fn full_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for suit in CardSuit::ALL {
        for number in CardNumber::ALL {
            cards.push(Card(number, suit));
        }
    }
    cards
}

/// The full deck minus every card in `known`.
pub fn remaining_deck(known: &[Card]) -> Vec<Card> {
    full_deck()
        .into_iter()
        .filter(|card| !known.contains(card))
        .collect()
}

/// Return a uniformly shuffled copy of `deck`, leaving the input untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(deck: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = deck.to_vec();
    shuffle_in_place(&mut shuffled, rng);
    shuffled
}

/// Fisher–Yates: walk from the last slot down, swapping each with a uniformly
/// chosen slot at or below it.
pub(crate) fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_card_display() {
        let card = Card(CardNumber::Ace, CardSuit::Spades);
        assert_eq!(format!("{}", card), "A♠");

        let card = Card(CardNumber::Ten, CardSuit::Hearts);
        assert_eq!(format!("{}", card), "T♥");

        let card = Card(CardNumber::Two, CardSuit::Diamonds);
        assert_eq!(format!("{}", card), "2♦");
    }

    #[test]
    fn test_card_parse() {
        assert_eq!("As".parse::<Card>(), Ok(Card(CardNumber::Ace, CardSuit::Spades)));
        assert_eq!("10h".parse::<Card>(), Ok(Card(CardNumber::Ten, CardSuit::Hearts)));
        assert_eq!("T♥".parse::<Card>(), Ok(Card(CardNumber::Ten, CardSuit::Hearts)));
        assert_eq!("qd".parse::<Card>(), Ok(Card(CardNumber::Queen, CardSuit::Diamonds)));
        assert_eq!("2c".parse::<Card>(), Ok(Card(CardNumber::Two, CardSuit::Clubs)));

        for bad in ["", "s", "1s", "11h", "Ax", "Kss"] {
            assert!(bad.parse::<Card>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_parse_cards_list() {
        let cards = parse_cards("As Kd, 7c").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[1], Card(CardNumber::King, CardSuit::Diamonds));
    }

    #[test]
    fn test_ensure_distinct() {
        let cards = parse_cards("As Kd 7c").unwrap();
        assert_eq!(ensure_distinct(&cards), Ok(()));

        let cards = parse_cards("As Kd As").unwrap();
        assert_eq!(
            ensure_distinct(&cards),
            Err(CardError::Duplicate(Card(CardNumber::Ace, CardSuit::Spades)))
        );
    }

    #[test]
    fn test_full_deck() {
        let cards = full_deck();
        assert_eq!(cards.len(), 52);
        assert_eq!(ensure_distinct(&cards), Ok(()));

        for number in CardNumber::ALL {
            let count = cards.iter().filter(|c| c.number() == number).count();
            assert_eq!(count, 4, "Should have 4 cards of {:?}", number);
        }

        for suit in CardSuit::ALL {
            let count = cards.iter().filter(|c| c.suit() == suit).count();
            assert_eq!(count, 13, "Should have 13 cards of {:?}", suit);
        }

        for (i, card) in cards.iter().enumerate() {
            assert_eq!(deck_index(*card), i);
        }
    }

    #[test]
    fn test_remaining_deck() {
        let known = parse_cards("As Kd 7c").unwrap();
        let rest = remaining_deck(&known);
        assert_eq!(rest.len(), 49);
        assert!(known.iter().all(|c| !rest.contains(c)));
    }

    #[test]
    fn test_shuffle_is_permutation_and_pure() {
        let deck = full_deck();
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = shuffle(&deck, &mut rng);

        assert_eq!(deck, full_deck(), "input must not be mutated");
        assert_ne!(shuffled, deck);

        let mut sorted = shuffled.clone();
        sorted.sort();
        let mut expected = deck.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_shuffle_reproducible_with_seed() {
        let deck = full_deck();
        let a = shuffle(&deck, &mut StdRng::seed_from_u64(42));
        let b = shuffle(&deck, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_number_values() {
        assert_eq!(CardNumber::Ace.value(), 14);
        assert_eq!(CardNumber::Jack.value(), 11);
        assert_eq!(CardNumber::from_value(5), Some(CardNumber::Five));
        assert_eq!(CardNumber::from_value(1), None);
        assert_eq!(CardNumber::from_value(15), None);
    }
}
