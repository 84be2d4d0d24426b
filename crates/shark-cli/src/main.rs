use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shark_core::config::RoundConfig;
use shark_core::history::WinRoad;
use shark_core::odds::SideBet;

mod render;
mod round;

use round::{Amount, BetSlip, RoundReport, Session};

#[derive(Parser)]
#[command(name = "shark")]
#[command(about = "Deal, quote and settle rounds of Shark or Master", long_about = None)]
struct Cli {
    /// Seed for shuffling and simulation (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding the round configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Equity simulation trials per deal
    #[arg(short, long)]
    iterations: Option<u32>,

    /// Main bet on Master (chips, or "all")
    #[arg(long, value_parser = round::parse_amount)]
    master: Option<Amount>,

    /// Main bet on Shark (chips, or "all")
    #[arg(long, value_parser = round::parse_amount)]
    shark: Option<Amount>,

    /// Side bet as BUCKET=AMOUNT, e.g. medium=50 (repeatable)
    #[arg(long = "side", value_parser = round::parse_side_bet)]
    side: Vec<(SideBet, Amount)>,

    /// Starting balance
    #[arg(short, long, default_value_t = 1_000)]
    balance: u64,

    /// Rounds to play; later rounds repeat the first round's bets
    #[arg(short, long, default_value_t = 1)]
    rounds: u32,

    /// Abandon the round instead of playing the last rejected deal
    #[arg(long)]
    strict: bool,

    /// Print the session as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    seed: u64,
    balance: u64,
    rounds: &'a [RoundReport],
    road: &'a WinRoad,
}

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean (respects RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RoundConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => RoundConfig::default(),
    };
    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
        config.validate()?;
    }

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, iterations = config.iterations, "starting session");
    let mut rng = StdRng::seed_from_u64(seed);

    let slip = BetSlip {
        master: cli.master,
        shark: cli.shark,
        side: cli.side,
    };
    let mut session = Session::new(cli.balance, cli.strict);
    let mut reports = Vec::new();

    for number in 1..=cli.rounds {
        let Some(report) = session
            .play(&mut rng, &config, &slip)
            .with_context(|| format!("round {number}"))?
        else {
            break;
        };
        if !cli.json {
            render::round(number, &report);
        }
        reports.push(report);
    }

    if cli.json {
        let report = SessionReport {
            seed,
            balance: session.balance,
            rounds: &reports,
            road: &session.road,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::summary(&session.road, session.balance);
    }
    Ok(())
}
