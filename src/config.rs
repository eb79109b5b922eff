use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::oracle::DEFAULT_BUDGET;
use crate::runner::DEFAULT_WORKERS;

const DEFAULT_DRAWS: usize = 1;
const MAX_WORKERS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawConfig {
    pub draws: usize,
    pub oracle_budget: Duration,
    pub workers: usize,
    pub seed: Option<u64>,
    pub roster: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub append: bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            draws: DEFAULT_DRAWS,
            oracle_budget: DEFAULT_BUDGET,
            workers: DEFAULT_WORKERS,
            seed: None,
            roster: None,
            output_dir: PathBuf::from("draws"),
            append: false,
        }
    }
}

impl DrawConfig {
    /// Environment first, then command-line flags on top.
    pub fn load(args: &[String]) -> Self {
        let mut cfg = Self::from_env();
        cfg.apply_args(args);
        cfg
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(n) = env_parse::<usize>("DRAW_COUNT") {
            cfg.draws = n;
        }
        if let Some(ms) = env_parse::<u64>("ORACLE_BUDGET_MS") {
            cfg.oracle_budget = budget_from_ms(ms);
        }
        if let Some(n) = env_parse::<usize>("DRAW_WORKERS") {
            cfg.workers = n.clamp(1, MAX_WORKERS);
        }
        cfg.seed = env_parse::<u64>("DRAW_SEED");
        cfg.roster = env_path("DRAW_ROSTER");
        if let Some(dir) = env_path("DRAW_OUTPUT_DIR") {
            cfg.output_dir = dir;
        }
        cfg
    }

    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(n) = arg_value(args, "--draws").and_then(|v| v.parse::<usize>().ok()) {
            self.draws = n;
        }
        if let Some(ms) = arg_value(args, "--budget-ms").and_then(|v| v.parse::<u64>().ok()) {
            self.oracle_budget = budget_from_ms(ms);
        }
        if let Some(n) = arg_value(args, "--workers").and_then(|v| v.parse::<usize>().ok()) {
            self.workers = n.clamp(1, MAX_WORKERS);
        }
        if let Some(seed) = arg_value(args, "--seed").and_then(|v| v.parse::<u64>().ok()) {
            self.seed = Some(seed);
        }
        if let Some(path) = arg_value(args, "--roster") {
            self.roster = Some(PathBuf::from(path));
        }
        if let Some(dir) = arg_value(args, "--out") {
            self.output_dir = PathBuf::from(dir);
        }
        if args.iter().any(|arg| arg == "--append") {
            self.append = true;
        }
    }
}

fn budget_from_ms(ms: u64) -> Duration {
    Duration::from_millis(ms.clamp(10, 600_000))
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.trim().parse::<T>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|val| !val.trim().is_empty())
        .map(|val| PathBuf::from(val.trim()))
}

/// Accepts both `--name=value` and `--name value`.
fn arg_value(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && !raw.trim().is_empty()
        {
            return Some(raw.trim().to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_override_defaults() {
        let mut cfg = DrawConfig::default();
        cfg.apply_args(&args(&[
            "--draws=12",
            "--budget-ms",
            "2500",
            "--workers=3",
            "--seed",
            "7",
            "--out=target/out",
            "--append",
        ]));
        assert_eq!(cfg.draws, 12);
        assert_eq!(cfg.oracle_budget, Duration::from_millis(2500));
        assert_eq!(cfg.workers, 3);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.output_dir, PathBuf::from("target/out"));
        assert!(cfg.append);
        assert!(cfg.roster.is_none());
    }

    #[test]
    fn out_of_range_values_are_clamped_and_junk_ignored() {
        let mut cfg = DrawConfig::default();
        cfg.apply_args(&args(&["--workers=0", "--budget-ms=1", "--draws=abc"]));
        assert_eq!(cfg.workers, 1);
        assert_eq!(cfg.oracle_budget, Duration::from_millis(10));
        assert_eq!(cfg.draws, DEFAULT_DRAWS);
    }
}
