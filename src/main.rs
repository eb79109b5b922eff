use std::time::Instant;

use anyhow::{Context, Result};

use ucl_draw::config::DrawConfig;
use ucl_draw::oracle::SearchOracle;
use ucl_draw::report::{self, RunSummary};
use ucl_draw::roster;
use ucl_draw::runner::DrawRunner;
use ucl_draw::teams::Teams;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = DrawConfig::load(&args);

    let teams = match &cfg.roster {
        Some(path) => Teams::load(path)?,
        None => roster::champions_league_2024().context("built-in roster")?,
    };
    log::info!(
        "{} teams, {} nationalities, oracle budget {:?}",
        teams.len(),
        teams.nationalities().len(),
        cfg.oracle_budget
    );

    let oracle = SearchOracle::new(cfg.oracle_budget);
    let started = Instant::now();
    let table = DrawRunner::new(&teams, &oracle)
        .workers(cfg.workers)
        .seed(cfg.seed)
        .run(cfg.draws)
        .context("draw run aborted")?;
    let elapsed = started.elapsed();

    let artifacts = report::render(&table, teams.len());
    let paths = report::write_artifacts(&cfg.output_dir, &artifacts, cfg.append)?;
    let summary = RunSummary {
        generated_at: chrono::Utc::now().to_rfc3339(),
        requested: cfg.draws,
        completed: table.completed(),
        failed: table.failed(),
        elapsed_secs: elapsed.as_secs_f64(),
        oracle_budget_ms: cfg.oracle_budget.as_millis() as u64,
        workers: cfg.workers,
        seed: cfg.seed,
        clubs: teams.ids().map(|id| teams.club(id).to_string()).collect(),
    };
    let summary_path = report::write_summary(&cfg.output_dir, &summary)?;

    println!(
        "Successfully completed {} out of {} draws in {:.1}s",
        table.completed(),
        cfg.draws,
        elapsed.as_secs_f64()
    );
    println!("Ratings: {}", paths.ratings.display());
    println!("Coefficients: {}", paths.coefficients.display());
    println!("Matches: {}", paths.matches.display());
    println!("Summary: {}", summary_path.display());

    Ok(())
}
