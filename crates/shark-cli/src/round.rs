//! Session orchestrator: deals, stakes and settles rounds against a running
//! balance.
//!
//! Drives the [`shark_core`] pipeline for one round at a time:
//! - [`find_acceptable_deal`] for the deal and its quote
//! - [`Wagers`] for staking against the balance
//! - [`settle`] once the board is out
//! - [`WinRoad`] for the session's win history

use anyhow::{Result, anyhow};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use shark_core::config::RoundConfig;
use shark_core::deal::{DealError, DealOffer, find_acceptable_deal};
use shark_core::eval::Side;
use shark_core::history::{RoadCell, WinRoad};
use shark_core::odds::SideBet;
use shark_core::settle::{Quote, Settlement, settle};
use shark_core::wagers::{BetError, BetTarget, Chip, Wagers, quick_bet};

/// A stake as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    Fixed(u64),
    AllIn,
}

impl Amount {
    fn resolve(self, balance: u64) -> u64 {
        match self {
            Amount::Fixed(amount) => amount,
            Amount::AllIn => quick_bet(Chip::AllIn, balance).unwrap_or(0),
        }
    }
}

/// Parse an amount: a whole number of chips or `all`.
pub fn parse_amount(text: &str) -> Result<Amount, String> {
    if text.trim().eq_ignore_ascii_case("all") {
        return Ok(Amount::AllIn);
    }
    text.trim()
        .parse::<u64>()
        .map(Amount::Fixed)
        .map_err(|e| format!("invalid amount {text:?}: {e}"))
}

/// Parse `BUCKET=AMOUNT`, e.g. `medium=50` or `very-high=all`.
pub fn parse_side_bet(text: &str) -> Result<(SideBet, Amount), String> {
    let (bucket, amount) = text
        .split_once('=')
        .ok_or_else(|| format!("expected BUCKET=AMOUNT, got {text:?}"))?;
    Ok((bucket.parse()?, parse_amount(amount)?))
}

/// Add a round's returns to the balance left after staking.
fn credit(balance: u64, returned: u64) -> Result<u64> {
    balance
        .checked_add(returned)
        .ok_or_else(|| anyhow!("balance overflow: {balance} + {returned}"))
}

/// Bets requested for the first round.
#[derive(Debug, Clone, Default)]
pub struct BetSlip {
    pub master: Option<Amount>,
    pub shark: Option<Amount>,
    pub side: Vec<(SideBet, Amount)>,
}

impl BetSlip {
    fn targets(&self) -> impl Iterator<Item = (BetTarget, Amount)> + '_ {
        [(Side::Master, self.master), (Side::Shark, self.shark)]
            .into_iter()
            .filter_map(|(side, amount)| amount.map(|a| (BetTarget::Main(side), a)))
            .chain(self.side.iter().map(|(bet, a)| (BetTarget::Side(*bet), *a)))
    }

    /// Place every bet in order, returning the slip and the balance left.
    pub fn stake(&self, balance: u64) -> Result<(Wagers, u64), BetError> {
        let mut wagers = Wagers::default();
        let mut balance = balance;
        for (target, amount) in self.targets() {
            balance = wagers.place(target, amount.resolve(balance), balance)?;
        }
        wagers.ensure_open()?;
        Ok((wagers, balance))
    }
}

/// Everything that happened in one round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub offer: DealOffer,
    pub quote: Quote,
    pub wagers: Wagers,
    pub settlement: Settlement,
    pub cell: RoadCell,
    /// Balance once the round was paid out.
    pub balance: u64,
}

/// Running state across rounds.
#[derive(Debug, Clone)]
pub struct Session {
    pub balance: u64,
    pub road: WinRoad,
    /// Whether to abandon the round instead of playing the last rejected deal.
    pub strict: bool,
    previous: Option<Wagers>,
}

impl Session {
    pub fn new(balance: u64, strict: bool) -> Self {
        Self {
            balance,
            road: WinRoad::new(),
            strict,
            previous: None,
        }
    }

    /// Play one round. The first round stakes `slip`; later rounds repeat
    /// the previous bets. Returns `None` once they are no longer affordable.
    pub fn play<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        config: &RoundConfig,
        slip: &BetSlip,
    ) -> Result<Option<RoundReport>> {
        let offer = self.deal(rng, config)?;
        let quote = Quote::from(&offer);

        let staked = match &self.previous {
            None => slip.stake(self.balance),
            Some(previous) => Wagers::repeat(previous, self.balance),
        };
        let (wagers, balance) = match staked {
            Ok(staked) => staked,
            Err(BetError::InsufficientFunds { needed, available }) if self.previous.is_some() => {
                info!(needed, available, "bets can no longer be repeated");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let settlement = settle(&offer.deal, &wagers, &quote, config.rake)?;
        self.balance = credit(balance, settlement.total)?;
        let cell = self.road.record(settlement.winner());
        self.previous = Some(wagers);

        info!(
            winner = %settlement.winner(),
            staked = wagers.total(),
            returned = settlement.total,
            balance = self.balance,
            "round complete"
        );
        Ok(Some(RoundReport {
            offer,
            quote,
            wagers,
            settlement,
            cell,
            balance: self.balance,
        }))
    }

    fn deal<R: Rng + ?Sized>(&self, rng: &mut R, config: &RoundConfig) -> Result<DealOffer> {
        match find_acceptable_deal(rng, config) {
            Ok(offer) => Ok(offer),
            Err(DealError::Exhausted {
                attempts,
                last: Some(last),
            }) if !self.strict => {
                warn!(attempts, "playing the last rejected deal");
                Ok(*last)
            }
            Err(e) => Err(e.into()),
        }
    }
}
