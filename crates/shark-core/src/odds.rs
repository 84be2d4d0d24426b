//! Side-bet buckets and the odds quoted for them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::equity::CategoryHistogram;
use crate::eval::HandRank;

/// A side wager on the category of the winning hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SideBet {
    /// High Card or One Pair.
    Low,
    /// Two Pair.
    Medium,
    /// Three of a Kind, Straight or Flush.
    High,
    /// Full House.
    VeryHigh,
    /// Four of a Kind, Straight Flush or Royal Flush.
    Premium,
}

impl SideBet {
    pub const ALL: [SideBet; 5] = [
        SideBet::Low,
        SideBet::Medium,
        SideBet::High,
        SideBet::VeryHigh,
        SideBet::Premium,
    ];

    /// Hand categories the bucket pays on.
    pub fn categories(self) -> &'static [HandRank] {
        match self {
            SideBet::Low => &[HandRank::HighCard, HandRank::Pair],
            SideBet::Medium => &[HandRank::TwoPair],
            SideBet::High => &[HandRank::ThreeOfAKind, HandRank::Straight, HandRank::Flush],
            SideBet::VeryHigh => &[HandRank::FullHouse],
            SideBet::Premium => &[
                HandRank::FourOfAKind,
                HandRank::StraightFlush,
                HandRank::RoyalFlush,
            ],
        }
    }

    /// The one bucket containing `rank`.
    pub fn for_category(rank: HandRank) -> SideBet {
        match rank {
            HandRank::HighCard | HandRank::Pair => SideBet::Low,
            HandRank::TwoPair => SideBet::Medium,
            HandRank::ThreeOfAKind | HandRank::Straight | HandRank::Flush => SideBet::High,
            HandRank::FullHouse => SideBet::VeryHigh,
            HandRank::FourOfAKind | HandRank::StraightFlush | HandRank::RoyalFlush => {
                SideBet::Premium
            }
        }
    }

    pub fn contains(self, rank: HandRank) -> bool {
        Self::for_category(rank) == self
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short identifier, as used on the command line.
    pub fn key(self) -> &'static str {
        match self {
            SideBet::Low => "LOW",
            SideBet::Medium => "MEDIUM",
            SideBet::High => "HIGH",
            SideBet::VeryHigh => "VERY_HIGH",
            SideBet::Premium => "PREMIUM",
        }
    }

    /// Human-readable label for UI display.
    pub fn label(self) -> &'static str {
        match self {
            SideBet::Low => "High Card/One Pair",
            SideBet::Medium => "Two Pair",
            SideBet::High => "Three Kind/Straight/Flush",
            SideBet::VeryHigh => "Full House",
            SideBet::Premium => "Quads/Royal/Straight Flush",
        }
    }
}

impl fmt::Display for SideBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SideBet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        SideBet::ALL
            .into_iter()
            .find(|bet| bet.key() == wanted)
            .ok_or_else(|| format!("unknown side bet {s:?}"))
    }
}

/// Probability of each side-bet bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketOdds {
    probabilities: [f64; 5],
}

impl BucketOdds {
    pub fn new(probabilities: [f64; 5]) -> Self {
        Self { probabilities }
    }

    pub fn probability(&self, bet: SideBet) -> f64 {
        self.probabilities[bet.index()]
    }

    /// Quoted payout multiplier, `None` when the bucket never hit.
    pub fn multiplier(&self, bet: SideBet) -> Option<f64> {
        payout_multiplier(self.probability(bet))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SideBet, f64)> + '_ {
        SideBet::ALL.iter().map(|bet| (*bet, self.probability(*bet)))
    }
}

/// Share of the histogram's trials landing in each bucket.
///
/// An empty histogram yields zero for every bucket.
pub fn bucket_odds(histogram: &CategoryHistogram) -> BucketOdds {
    let total = histogram.total();
    let mut probabilities = [0.0; 5];
    if total == 0 {
        return BucketOdds::new(probabilities);
    }
    for (rank, count) in histogram.iter() {
        probabilities[SideBet::for_category(rank).index()] += f64::from(count);
    }
    for p in &mut probabilities {
        *p /= f64::from(total);
    }
    BucketOdds::new(probabilities)
}

/// `1 / probability` quoted to two decimals, or `None` when nothing is
/// offered for an outcome that never occurred.
pub fn payout_multiplier(probability: f64) -> Option<f64> {
    quoted_hundredths(probability).map(|h| h as f64 / 100.0)
}

/// The quoted multiplier in hundredths (`2.17` → `217`).
pub(crate) fn quoted_hundredths(probability: f64) -> Option<u64> {
    if !probability.is_finite() || probability <= 0.0 {
        return None;
    }
    Some((100.0 / probability).round() as u64)
}
