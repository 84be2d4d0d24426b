pub mod attribution;
pub mod cards;
pub mod config;
pub mod deal;
pub mod equity;
pub mod eval;
pub mod history;
pub mod odds;
pub mod settle;
pub mod wagers;

pub use cards::{Card, CardNumber, CardSuit};
pub use config::RoundConfig;
pub use deal::{Deal, DealOffer, find_acceptable_deal};
pub use eval::{HandRank, HandStrength, Side, Winner, compare, evaluate};
pub use odds::{BucketOdds, SideBet};
pub use settle::{Quote, Settlement, settle};
pub use wagers::Wagers;
