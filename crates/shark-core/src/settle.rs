//! Settling a round once the whole board is out.
//!
//! Payouts use the odds quoted before betting closed ([`Quote`]), never odds
//! recomputed from the revealed board. Every amount reported is what goes
//! back to the player's balance, stake included.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::attribution::winning_indices;
use crate::deal::{Deal, DealOffer};
use crate::eval::{EvalError, Showdown, Side, Winner, seven_cards, showdown};
use crate::odds::{BucketOdds, SideBet, payout_multiplier, quoted_hundredths};
use crate::wagers::Wagers;

/// Basis points in a whole.
const BPS: u128 = 10_000;

/// Errors that can occur during settlement. No partial result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettleError {
    #[error("rake must be in (0, 1], got {0}")]
    InvalidRake(f64),

    #[error("quoted probability out of range: {0}")]
    InvalidQuote(f64),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Odds snapshot taken before betting closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub master_win: f64,
    pub shark_win: f64,
    pub odds: BucketOdds,
}

impl Quote {
    pub fn win_probability(&self, side: Side) -> f64 {
        match side {
            Side::Master => self.master_win,
            Side::Shark => self.shark_win,
        }
    }

    /// Main-bet multiplier quoted for `side`.
    pub fn multiplier(&self, side: Side) -> Option<f64> {
        payout_multiplier(self.win_probability(side))
    }

    fn validate(&self) -> Result<(), SettleError> {
        let main = [self.master_win, self.shark_win];
        let buckets = SideBet::ALL.map(|bet| self.odds.probability(bet));
        match main.iter().chain(&buckets).find(|p| !(0.0..=1.0).contains(*p)) {
            Some(p) => Err(SettleError::InvalidQuote(*p)),
            None => Ok(()),
        }
    }
}

impl From<&DealOffer> for Quote {
    fn from(offer: &DealOffer) -> Self {
        Quote {
            master_win: offer.equity.master_win,
            shark_win: offer.equity.shark_win,
            odds: offer.odds,
        }
    }
}

/// What happened to one stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "amount", rename_all = "lowercase")]
pub enum Payout {
    /// Paid at the quoted multiplier, after rake.
    Won(u64),
    /// Stake forfeited.
    Lost,
    /// Stake handed back untouched (a tie, or a winner that was quoted no odds).
    Returned(u64),
}

impl Payout {
    /// Amount credited back to the player.
    pub fn amount(self) -> u64 {
        match self {
            Payout::Won(amount) | Payout::Returned(amount) => amount,
            Payout::Lost => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainLine {
    pub side: Side,
    pub stake: u64,
    pub payout: Payout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideLine {
    pub bet: SideBet,
    pub stake: u64,
    pub payout: Payout,
}

/// Full result of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub showdown: Showdown,
    /// Main bets with a stake, Master first.
    pub main: Vec<MainLine>,
    /// Side bets with a stake, in bucket order.
    pub side_bets: Vec<SideLine>,
    /// Positions of the winning five within the winner's hole cards followed
    /// by the board (Master's hand on a tie).
    pub winning_indices: Vec<usize>,
    /// Everything credited back to the player.
    pub total: u64,
}

impl Settlement {
    pub fn winner(&self) -> Winner {
        self.showdown.winner
    }

    /// Credited from side bets alone.
    pub fn side_total(&self) -> u64 {
        credited(self.side_bets.iter().map(|line| line.payout))
    }

    /// Credited from main bets alone.
    pub fn main_total(&self) -> u64 {
        credited(self.main.iter().map(|line| line.payout))
    }
}

/// Sum of credited amounts, capped at `u64::MAX`.
fn credited(payouts: impl Iterator<Item = Payout>) -> u64 {
    payouts.fold(0, |total, payout| total.saturating_add(payout.amount()))
}

/// Settle `wagers` on the fully revealed `deal`.
///
/// `rake` is the share of winnings paid out (0.95 keeps 5% for the house).
pub fn settle(
    deal: &Deal,
    wagers: &Wagers,
    quote: &Quote,
    rake: f64,
) -> Result<Settlement, SettleError> {
    if !(rake > 0.0 && rake <= 1.0) {
        return Err(SettleError::InvalidRake(rake));
    }
    quote.validate()?;
    let rake_bps = (rake * BPS as f64).round() as u128;

    let showdown = showdown(deal.master, deal.shark, &deal.board)?;
    let winner = showdown.winner;

    let main = [Side::Master, Side::Shark]
        .into_iter()
        .filter(|side| wagers.main(*side) > 0)
        .map(|side| {
            let stake = wagers.main(side);
            let payout = match winner.side() {
                None => Payout::Returned(stake),
                Some(won) if won == side => {
                    pay(stake, quote.win_probability(side), rake_bps)
                }
                Some(_) => Payout::Lost,
            };
            MainLine {
                side,
                stake,
                payout,
            }
        })
        .collect::<Vec<_>>();

    let category = showdown.winning_hand().rank();
    let side_bets = wagers
        .active_side_bets()
        .map(|(bet, stake)| {
            let payout = if bet.contains(category) {
                pay(stake, quote.odds.probability(bet), rake_bps)
            } else {
                Payout::Lost
            };
            SideLine { bet, stake, payout }
        })
        .collect::<Vec<_>>();

    let winning_side = winner.side().unwrap_or(Side::Master);
    let hand = seven_cards(deal.hole(winning_side), &deal.board);
    let winning_indices = winning_indices(&hand, showdown.winning_hand());

    let total = credited(
        main.iter()
            .map(|line| line.payout)
            .chain(side_bets.iter().map(|line| line.payout)),
    );

    debug!(%winner, %category, total, "round settled");
    Ok(Settlement {
        showdown,
        main,
        side_bets,
        winning_indices,
        total,
    })
}

/// `floor(stake × multiplier × rake)` with the two-decimal quoted
/// multiplier, in exact integer arithmetic. Saturates at `u64::MAX`.
fn pay(stake: u64, probability: f64, rake_bps: u128) -> Payout {
    match quoted_hundredths(probability) {
        Some(hundredths) => {
            let amount = u128::from(stake)
                .saturating_mul(u128::from(hundredths))
                .saturating_mul(rake_bps)
                / (100 * BPS);
            Payout::Won(u64::try_from(amount).unwrap_or(u64::MAX))
        }
        None => Payout::Returned(stake),
    }
}
