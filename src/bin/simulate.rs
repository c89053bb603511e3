use clap::Parser;
use dark_maze::constants::TICK_MS;
use dark_maze::engine::{auto_intent, RaceEngine, RaceOptions};
use dark_maze::types::RaceSummary;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Headless race runner: drives both racers along shortest paths and
/// reports finish times, one JSON line per race.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value_t = 12)]
    rows: usize,
    #[arg(long, default_value_t = 12)]
    cols: usize,
    #[arg(long, default_value_t = 0)]
    seed: u32,
    /// Number of races; seeds count up from --seed.
    #[arg(long, default_value_t = 1)]
    races: u32,
    /// Safety cap on simulated ticks per race.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BatchSummary {
    races: u32,
    rows: usize,
    cols: usize,
    #[serde(rename = "firstSeed")]
    first_seed: u32,
    #[serde(rename = "winsByRacer")]
    wins_by_racer: [u32; 2],
    #[serde(rename = "unfinishedRaces")]
    unfinished: u32,
    #[serde(rename = "averageWinnerTimeMs")]
    average_winner_time_ms: u64,
    results: Vec<RaceSummary>,
}

fn run_race(rows: usize, cols: usize, seed: u32, max_ticks: u64) -> RaceSummary {
    let mut engine = RaceEngine::new(rows, cols, seed, RaceOptions::default());
    for _ in 0..max_ticks {
        if engine.is_over() {
            break;
        }
        let intents = [auto_intent(&engine, 0), auto_intent(&engine, 1)];
        engine.step(TICK_MS, intents);
    }
    engine.summary()
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut results = Vec::new();
    let mut wins = [0u32; 2];
    let mut unfinished = 0u32;
    let mut winner_time_total = 0u64;

    for offset in 0..cli.races {
        let seed = cli.seed.wrapping_add(offset);
        log::info!("race started, seed {seed}");
        let summary = run_race(cli.rows, cli.cols, seed, cli.max_ticks);
        match summary.winner {
            Some(idx) => {
                wins[idx] += 1;
                if let Some(Some(t)) = summary.finish_times_ms.get(idx) {
                    winner_time_total += t;
                }
            }
            None => unfinished += 1,
        }
        match serde_json::to_string(&summary) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("race summary failed to serialize: {e}"),
        }
        results.push(summary);
    }

    let decided = cli.races - unfinished;
    let batch = BatchSummary {
        races: cli.races,
        rows: cli.rows,
        cols: cli.cols,
        first_seed: cli.seed,
        wins_by_racer: wins,
        unfinished,
        average_winner_time_ms: if decided > 0 {
            winner_time_total / decided as u64
        } else {
            0
        },
        results,
    };

    if let Some(path) = &cli.summary_out {
        match serde_json::to_string_pretty(&batch) {
            Ok(text) => {
                if let Err(e) = fs::write(path, text) {
                    log::error!("failed to write {}: {e}", path.display());
                    std::process::exit(1);
                }
                log::info!("summary written to {}", path.display());
            }
            Err(e) => {
                log::error!("batch summary failed to serialize: {e}");
                std::process::exit(1);
            }
        }
    }

    if unfinished > 0 {
        log::warn!("{unfinished} of {} races hit the tick cap", cli.races);
        std::process::exit(2);
    }
}
