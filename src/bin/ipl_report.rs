use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use ipl_terminal::analysis::{self, AllRounderTotals, BowlerTotals};
use ipl_terminal::config::AppConfig;
use ipl_terminal::dataset::load_dataset;
use ipl_terminal::logging;

const TOP_N: usize = 5;

#[derive(Debug, Serialize)]
struct Report {
    source: String,
    records: usize,
    players: usize,
    matches: usize,
    teams: usize,
    seasons: Vec<String>,
    best_bowler: Option<BowlerTotals>,
    best_allrounder: Option<AllRounderTotals>,
    top_bowlers: Vec<BowlerTotals>,
    top_allrounders: Vec<AllRounderTotals>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init_stderr_logger();

    let path = parse_data_arg().unwrap_or_else(|| AppConfig::from_env().dataset_path);
    let dataset =
        load_dataset(&path).with_context(|| format!("load dataset {}", path.display()))?;

    let bowlers = analysis::bowler_leaderboard(&dataset);
    let allrounders = analysis::allrounder_leaderboard(&dataset);
    let report = Report {
        source: path.display().to_string(),
        records: dataset.len(),
        players: dataset.players().len(),
        matches: dataset.match_ids().len(),
        teams: dataset.teams().len(),
        seasons: dataset.seasons().iter().map(|s| s.to_string()).collect(),
        best_bowler: bowlers.first().cloned(),
        best_allrounder: allrounders.first().cloned(),
        top_bowlers: bowlers.into_iter().take(TOP_N).collect(),
        top_allrounders: allrounders.into_iter().take(TOP_N).collect(),
    };

    if has_flag("--json") {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
        return Ok(());
    }

    println!("IPL dataset summary");
    println!("Source: {}", report.source);
    println!(
        "Records: {} | Players: {} | Matches: {} | Teams: {}",
        report.records, report.players, report.matches, report.teams
    );
    if !report.seasons.is_empty() {
        println!("Seasons: {}", report.seasons.join(", "));
    }
    match &report.best_bowler {
        Some(best) => println!(
            "The best bowler in IPL is {} with {} wickets.",
            best.player, best.wickets
        ),
        None => println!("No bowlers: dataset is empty"),
    }
    match &report.best_allrounder {
        Some(best) => println!(
            "The best all-rounder in IPL is {} with {} AllRounder Score.",
            best.player, best.score
        ),
        None => println!("No all-rounders: dataset is empty"),
    }

    if !report.top_bowlers.is_empty() {
        println!("Top bowlers:");
        for (rank, b) in report.top_bowlers.iter().enumerate() {
            println!(
                " {}. {:<24} {:>4} wkts  econ {}",
                rank + 1,
                b.player,
                b.wickets,
                analysis::format_rate(b.economy_mean)
            );
        }
    }
    if !report.top_allrounders.is_empty() {
        println!("Top all-rounders:");
        for (rank, a) in report.top_allrounders.iter().enumerate() {
            println!(
                " {}. {:<24} {:>5} runs {:>4} wkts  score {}",
                rank + 1,
                a.player,
                a.runs,
                a.wickets,
                a.score
            );
        }
    }

    Ok(())
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}

fn parse_data_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--data=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--data" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
