//! The player's bet slip for one round.
//!
//! The balance lives with the caller; every operation takes the current
//! balance and hands back the new one, so nothing here owns money.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eval::Side;
use crate::odds::SideBet;

/// Chip denominations offered by the quick-bet buttons, largest first.
pub const CHIP_VALUES: [u64; 5] = [10_000, 1_000, 100, 10, 1];

/// Errors that can occur while placing bets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BetError {
    #[error("bet amount must be positive")]
    ZeroAmount,

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("no previous bets to repeat")]
    NothingToRepeat,

    #[error("place at least one bet before the round starts")]
    NoBets,
}

/// Where a stake goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetTarget {
    Main(Side),
    Side(SideBet),
}

/// Stakes on both main sides and every side-bet bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wagers {
    pub master: u64,
    pub shark: u64,
    pub side: [u64; 5],
}

impl Wagers {
    pub fn main(&self, side: Side) -> u64 {
        match side {
            Side::Master => self.master,
            Side::Shark => self.shark,
        }
    }

    pub fn side(&self, bet: SideBet) -> u64 {
        self.side[bet.index()]
    }

    /// Total staked across all targets.
    pub fn total(&self) -> u64 {
        self.master + self.shark + self.side.iter().sum::<u64>()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Side-bet buckets holding a stake.
    pub fn active_side_bets(&self) -> impl Iterator<Item = (SideBet, u64)> + '_ {
        SideBet::ALL
            .into_iter()
            .map(|bet| (bet, self.side(bet)))
            .filter(|(_, amount)| *amount > 0)
    }

    /// Add `amount` to `target`, returning the balance left afterwards.
    pub fn place(&mut self, target: BetTarget, amount: u64, balance: u64) -> Result<u64, BetError> {
        if amount == 0 {
            return Err(BetError::ZeroAmount);
        }
        if amount > balance {
            return Err(BetError::InsufficientFunds {
                needed: amount,
                available: balance,
            });
        }
        match target {
            BetTarget::Main(Side::Master) => self.master += amount,
            BetTarget::Main(Side::Shark) => self.shark += amount,
            BetTarget::Side(bet) => self.side[bet.index()] += amount,
        }
        Ok(balance - amount)
    }

    /// Stake last round's bets again, returning them with the new balance.
    pub fn repeat(previous: &Wagers, balance: u64) -> Result<(Wagers, u64), BetError> {
        if previous.is_empty() {
            return Err(BetError::NothingToRepeat);
        }
        let needed = previous.total();
        if needed > balance {
            return Err(BetError::InsufficientFunds {
                needed,
                available: balance,
            });
        }
        Ok((*previous, balance - needed))
    }

    /// Take every bet back, returning the restored balance.
    pub fn clear(&mut self, balance: u64) -> u64 {
        let refunded = balance + self.total();
        *self = Wagers::default();
        refunded
    }

    /// A round can only start with money on the table.
    pub fn ensure_open(&self) -> Result<(), BetError> {
        if self.is_empty() {
            Err(BetError::NoBets)
        } else {
            Ok(())
        }
    }
}

/// A quick-bet button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    Amount(u64),
    AllIn,
}

/// Bet size selected by a quick-bet button; a chip larger than the balance
/// falls back to the largest affordable denomination.
pub fn quick_bet(chip: Chip, balance: u64) -> Option<u64> {
    let amount = match chip {
        Chip::AllIn => balance,
        Chip::Amount(value) if value <= balance => value,
        Chip::Amount(_) => CHIP_VALUES.into_iter().find(|v| *v <= balance)?,
    };
    (amount > 0).then_some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_deducts_balance() {
        let mut wagers = Wagers::default();
        let balance = wagers
            .place(BetTarget::Main(Side::Master), 100, 1_000)
            .unwrap();
        let balance = wagers
            .place(BetTarget::Side(SideBet::Medium), 50, balance)
            .unwrap();
        let balance = wagers
            .place(BetTarget::Main(Side::Master), 25, balance)
            .unwrap();

        assert_eq!(balance, 825);
        assert_eq!(wagers.master, 125);
        assert_eq!(wagers.side(SideBet::Medium), 50);
        assert_eq!(wagers.total(), 175);
        assert_eq!(
            wagers.active_side_bets().collect::<Vec<_>>(),
            vec![(SideBet::Medium, 50)]
        );
    }

    #[test]
    fn test_place_rejects_bad_amounts() {
        let mut wagers = Wagers::default();
        assert_eq!(
            wagers.place(BetTarget::Main(Side::Shark), 0, 100),
            Err(BetError::ZeroAmount)
        );
        assert_eq!(
            wagers.place(BetTarget::Main(Side::Shark), 101, 100),
            Err(BetError::InsufficientFunds {
                needed: 101,
                available: 100
            })
        );
        assert!(wagers.is_empty());
        assert_eq!(wagers.ensure_open(), Err(BetError::NoBets));
    }

    #[test]
    fn test_repeat_and_clear() {
        let mut previous = Wagers::default();
        previous.place(BetTarget::Main(Side::Shark), 40, 100).unwrap();
        previous.place(BetTarget::Side(SideBet::Low), 10, 60).unwrap();

        let (mut again, balance) = Wagers::repeat(&previous, 500).unwrap();
        assert_eq!(again, previous);
        assert_eq!(balance, 450);

        assert_eq!(
            Wagers::repeat(&previous, 49),
            Err(BetError::InsufficientFunds {
                needed: 50,
                available: 49
            })
        );
        assert_eq!(
            Wagers::repeat(&Wagers::default(), 500),
            Err(BetError::NothingToRepeat)
        );

        assert_eq!(again.clear(balance), 500);
        assert!(again.is_empty());
    }

    #[test]
    fn test_quick_bet() {
        assert_eq!(quick_bet(Chip::Amount(100), 1_000), Some(100));
        assert_eq!(quick_bet(Chip::Amount(10_000), 2_500), Some(1_000));
        assert_eq!(quick_bet(Chip::Amount(10), 7), Some(1));
        assert_eq!(quick_bet(Chip::AllIn, 2_345), Some(2_345));
        assert_eq!(quick_bet(Chip::Amount(10), 0), None);
        assert_eq!(quick_bet(Chip::AllIn, 0), None);
    }
}
