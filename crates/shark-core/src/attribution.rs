//! Which cards make the winning five.
//!
//! Given the cards a hand was evaluated from and the resulting
//! [`HandStrength`], pick the positions of the five cards that realise it so
//! a front end can highlight them. Suit and straight detection reuse the
//! evaluator's helpers, so the highlighted cards always agree with the
//! reported category.

use crate::cards::{Card, CardNumber, CardSuit};
use crate::eval::{HandStrength, flush_suit, straight_ranks};

/// Indices into `hand` (ascending) of the cards forming `strength`.
///
/// For a 7-card hand laid out as hole cards then board, index 0 and 1 are
/// the hole cards. Where several cards share a rank the earliest wins.
pub fn winning_indices(hand: &[Card], strength: &HandStrength) -> Vec<usize> {
    let singles = |ranks: &[CardNumber]| ranks.iter().map(|r| (*r, 1)).collect::<Vec<_>>();

    let (suit, wanted) = match *strength {
        HandStrength::RoyalFlush => (flush_suit(hand), singles(&straight_ranks(CardNumber::Ace))),
        HandStrength::StraightFlush { high } => (flush_suit(hand), singles(&straight_ranks(high))),
        HandStrength::Flush { ranks } => (flush_suit(hand), singles(&ranks)),
        HandStrength::Straight { high } => (None, singles(&straight_ranks(high))),
        HandStrength::FourOfAKind { quads, kicker } => (None, vec![(quads, 4), (kicker, 1)]),
        HandStrength::FullHouse { trips, pair } => (None, vec![(trips, 3), (pair, 2)]),
        HandStrength::ThreeOfAKind { trips, kickers } => {
            (None, vec![(trips, 3), (kickers[0], 1), (kickers[1], 1)])
        }
        HandStrength::TwoPair { high, low, kicker } => {
            (None, vec![(high, 2), (low, 2), (kicker, 1)])
        }
        HandStrength::Pair { pair, kickers } => (
            None,
            vec![(pair, 2), (kickers[0], 1), (kickers[1], 1), (kickers[2], 1)],
        ),
        HandStrength::HighCard { ranks } => (None, singles(&ranks)),
    };

    let mut indices = pick(hand, &wanted, suit);
    indices.sort_unstable();
    indices
}

/// Take up to `count` cards of each wanted rank, optionally only from `suit`.
fn pick(hand: &[Card], wanted: &[(CardNumber, usize)], suit: Option<CardSuit>) -> Vec<usize> {
    let mut taken = Vec::with_capacity(5);
    for &(number, count) in wanted {
        let matching = hand
            .iter()
            .enumerate()
            .filter(|(i, card)| {
                card.number() == number
                    && suit.is_none_or(|s| card.suit() == s)
                    && !taken.contains(i)
            })
            .map(|(i, _)| i)
            .take(count)
            .collect::<Vec<_>>();
        taken.extend(matching);
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::eval::{HandRank, evaluate};

    fn attribute(text: &str) -> (HandStrength, Vec<usize>) {
        let hand = parse_cards(text).unwrap();
        let strength = evaluate(&hand).unwrap();
        (strength, winning_indices(&hand, &strength))
    }

    #[test]
    fn test_wheel() {
        let (strength, indices) = attribute("As 2d 3c 4h 5s 9c Kd");
        assert_eq!(strength, HandStrength::Straight { high: CardNumber::Five });
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_wheel_with_six_leaves_six_out() {
        let (strength, indices) = attribute("As 2d 3c 4h 5s 6c Kd");
        assert_eq!(strength, HandStrength::Straight { high: CardNumber::Five });
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_straight_skips_duplicate_rank() {
        let (_, indices) = attribute("9s 8h 7c 7d 6d 5s Kc");
        assert_eq!(indices, vec![0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_royal_flush_ignores_off_suit() {
        let (strength, indices) = attribute("Ah Ac Th Jh Qh Kh 3d");
        assert_eq!(strength, HandStrength::RoyalFlush);
        assert_eq!(indices, vec![0, 2, 3, 4, 5]);
    }

    #[test]
    fn test_straight_flush_not_the_higher_plain_straight() {
        // 5-9 of hearts with an off-suit ten: the straight flush is 9 high.
        let (strength, indices) = attribute("Td 9h 8h 7h 6h 5h 2c");
        assert_eq!(strength.rank(), HandRank::StraightFlush);
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_flush_takes_top_five_of_suit() {
        let (strength, indices) = attribute("2c Ac Tc 7c Kh 4c 3c");
        assert_eq!(strength.rank(), HandRank::Flush);
        assert_eq!(indices, vec![1, 2, 3, 5, 6]);
    }

    #[test]
    fn test_quads_with_paired_kicker() {
        let (_, indices) = attribute("9s Kd 9h 9d 9c Ks 2h");
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_full_house_from_two_trips() {
        let (_, indices) = attribute("5s 8c 5h 5d 8s 8h Ac");
        // Eights full of fives: all three eights, the first two fives.
        assert_eq!(indices, vec![0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_two_pair_with_third_pair() {
        let (_, indices) = attribute("3s Kh Qd Qc Ks 3h 2c");
        // Kings and queens with a three kicker: first three only.
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_trips_and_pair_and_high_card() {
        let (_, indices) = attribute("Js Jh 2c Ac Ks Jd 3h");
        assert_eq!(indices, vec![0, 1, 3, 4, 5]);

        let (_, indices) = attribute("Qs 4d Qh Ad Kc Js 2h");
        assert_eq!(indices, vec![0, 2, 3, 4, 5]);

        let (_, indices) = attribute("As 3c Kh 9d 7c 4s 2h");
        assert_eq!(indices, vec![0, 2, 3, 4, 5]);
    }

    #[test]
    fn test_always_five_for_seven_cards() {
        let samples = [
            "As 2d 3c 4h 5s 9c Kd",
            "Th Jh Qh Kh Ah 2c 3d",
            "Ks Kh Qd Qc 3s 3h 2c",
            "9s 9h 9d 9c 2s 2h Kd",
            "Qs Qh Qd Jc Js Jh 3c",
            "As Kh 9d 7c 4s 2h 3c",
        ];
        for sample in samples {
            let (_, indices) = attribute(sample);
            assert_eq!(indices.len(), 5, "{sample}");
        }
    }
}
