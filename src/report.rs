use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::runner::{DrawRecord, DrawTable};

pub const RATING_FILE: &str = "opponents_rating.txt";
pub const COEFFICIENT_FILE: &str = "opponents_coefficient.txt";
pub const MATCHES_FILE: &str = "matches.txt";
pub const SUMMARY_FILE: &str = "summary.json";

/// The three row-per-draw text artifacts. Failed draws render as zero rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub ratings: String,
    pub coefficients: String,
    pub matches: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub requested: usize,
    pub completed: usize,
    pub failed: usize,
    pub elapsed_secs: f64,
    pub oracle_budget_ms: u64,
    pub workers: usize,
    pub seed: Option<u64>,
    pub clubs: Vec<String>,
}

pub fn render(table: &DrawTable, team_count: usize) -> Artifacts {
    let mut out = Artifacts::default();
    for row in &table.rows {
        let record = row.as_ref();
        out.ratings
            .push_str(&sum_row(record.map(|r| r.rating_sums.as_slice()), team_count));
        out.ratings.push('\n');
        out.coefficients.push_str(&sum_row(
            record.map(|r| r.coefficient_sums.as_slice()),
            team_count,
        ));
        out.coefficients.push('\n');
        out.matches.push_str(&match_row(record, team_count));
        out.matches.push('\n');
    }
    out
}

fn sum_row(values: Option<&[f64]>, team_count: usize) -> String {
    match values {
        Some(values) => values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        None => vec!["0"; team_count].join(" "),
    }
}

/// Per team: four `(team, home_opponent)` tuples, then four
/// `(away_opponent, team)` tuples, using 1-based club numbers.
fn match_row(record: Option<&DrawRecord>, team_count: usize) -> String {
    let mut cells = Vec::with_capacity(team_count * 8);
    for idx in 0..team_count {
        let team = idx + 1;
        match record.and_then(|r| r.schedule.get(idx)) {
            Some(schedule) => {
                cells.extend(
                    schedule
                        .home
                        .iter()
                        .map(|opp| format!("({team}, {})", opp.club_number())),
                );
                cells.extend(
                    schedule
                        .away
                        .iter()
                        .map(|opp| format!("({}, {team})", opp.club_number())),
                );
            }
            None => {
                cells.extend((0..4).map(|_| format!("({team}, 0)")));
                cells.extend((0..4).map(|_| format!("(0, {team})")));
            }
        }
    }
    cells.join(" ")
}

pub struct ArtifactPaths {
    pub ratings: PathBuf,
    pub coefficients: PathBuf,
    pub matches: PathBuf,
}

pub fn write_artifacts(dir: &Path, artifacts: &Artifacts, append: bool) -> Result<ArtifactPaths> {
    fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;
    let paths = ArtifactPaths {
        ratings: dir.join(RATING_FILE),
        coefficients: dir.join(COEFFICIENT_FILE),
        matches: dir.join(MATCHES_FILE),
    };
    write_text(&paths.ratings, &artifacts.ratings, append)?;
    write_text(&paths.coefficients, &artifacts.coefficients, append)?;
    write_text(&paths.matches, &artifacts.matches, append)?;
    Ok(paths)
}

fn write_text(path: &Path, body: &str, append: bool) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    file.write_all(body.as_bytes())
        .with_context(|| format!("write {}", path.display()))
}

pub fn write_summary(dir: &Path, summary: &RunSummary) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;
    let path = dir.join(SUMMARY_FILE);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(summary).context("serialize run summary")?;
    fs::write(&tmp, json).context("write run summary")?;
    fs::rename(&tmp, &path).context("swap run summary")?;
    Ok(path)
}
