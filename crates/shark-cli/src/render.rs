//! Plain-text output for the terminal.

use shark_core::cards::Card;
use shark_core::eval::{Side, Winner, seven_cards};
use shark_core::history::{COLUMNS, ROWS, WinRoad};
use shark_core::odds::{SideBet, payout_multiplier};
use shark_core::settle::Payout;

use crate::round::RoundReport;

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

pub fn round(number: u32, report: &RoundReport) {
    let deal = &report.offer.deal;
    let quote = &report.quote;
    let showdown = &report.settlement.showdown;

    println!("Round {number}");
    println!("  Master  {}", cards(&deal.master));
    println!("  Shark   {}", cards(&deal.shark));
    println!();
    println!("  {:<28} {:>7} {:>7} {:>7}", "Bet", "Chance", "Pays", "Stake");
    for side in [Side::Master, Side::Shark] {
        println!(
            "  {:<28} {:>6.1}% {:>7} {:>7}",
            side.name(),
            quote.win_probability(side) * 100.0,
            multiplier(quote.multiplier(side)),
            stake(report.wagers.main(side)),
        );
    }
    println!(
        "  {:<28} {:>6.1}% {:>7} {:>7}",
        "Tie",
        report.offer.equity.tie * 100.0,
        "push",
        "",
    );
    for bet in SideBet::ALL {
        let p = quote.odds.probability(bet);
        println!(
            "  {:<28} {:>6.1}% {:>7} {:>7}",
            bet.label(),
            p * 100.0,
            multiplier(payout_multiplier(p)),
            stake(report.wagers.side(bet)),
        );
    }
    println!();

    println!("  Board   {}", cards(&deal.board));
    println!("  Master  {}", showdown.master);
    println!("  Shark   {}", showdown.shark);

    let winner = report.settlement.winner();
    let hand = seven_cards(deal.hole(winner.side().unwrap_or(Side::Master)), &deal.board);
    let best: Vec<Card> = report
        .settlement
        .winning_indices
        .iter()
        .map(|&i| hand[i])
        .collect();
    match winner {
        Winner::Tie => println!("  Tie with {}", cards(&best)),
        _ => println!("  {winner} wins with {}", cards(&best)),
    }
    println!();

    for line in &report.settlement.main {
        println!("  {:<28} {}", line.side.name(), outcome(line.stake, line.payout));
    }
    for line in &report.settlement.side_bets {
        println!("  {:<28} {}", line.bet.label(), outcome(line.stake, line.payout));
    }
    println!(
        "  Returned {}, balance {}",
        report.settlement.total, report.balance
    );
    println!();
}

fn cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn multiplier(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |m| format!("x{m:.2}"))
}

fn stake(amount: u64) -> String {
    if amount == 0 {
        String::new()
    } else {
        amount.to_string()
    }
}

fn outcome(stake: u64, payout: Payout) -> String {
    match payout {
        Payout::Won(amount) => format!("{stake} won, paid {amount}"),
        Payout::Lost => format!("{stake} lost"),
        Payout::Returned(amount) => format!("{stake} returned ({amount})"),
    }
}

// ---------------------------------------------------------------------------
// Session summary
// ---------------------------------------------------------------------------

pub fn summary(road: &WinRoad, balance: u64) {
    let tally = road.tally();
    println!(
        "Master {}  Shark {}  Tie {}  ({} rounds)",
        tally.master,
        tally.shark,
        tally.tie,
        tally.total()
    );

    let mut grid = [['.'; COLUMNS]; ROWS];
    for cell in road.cells() {
        grid[cell.row][cell.column] = match cell.winner {
            Winner::Master => 'M',
            Winner::Shark => 'S',
            Winner::Tie => 'T',
        };
    }
    let used = road.cells().iter().map(|c| c.row + 1).max().unwrap_or(0);
    for row in grid.iter().take(used) {
        println!("  {}", row.iter().collect::<String>());
    }
    println!("Balance {balance}");
}
