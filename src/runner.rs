use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::constraints::ConstraintState;
use crate::draw::{DrawOutcome, run_draw};
use crate::error::DrawError;
use crate::oracle::FeasibilityOracle;
use crate::teams::{POT_COUNT, TeamId, Teams, pot_label};

pub const DEFAULT_WORKERS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamSchedule {
    /// Opponent hosted from each pot.
    pub home: [TeamId; POT_COUNT],
    /// Host faced from each pot.
    pub away: [TeamId; POT_COUNT],
}

/// Aggregates of one completed draw, indexed by team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawRecord {
    pub rating_sums: Vec<f64>,
    pub coefficient_sums: Vec<f64>,
    pub schedule: Vec<TeamSchedule>,
}

impl DrawRecord {
    pub fn from_state(teams: &Teams, state: &ConstraintState) -> Result<Self, DrawError> {
        let mut rating_sums = Vec::with_capacity(teams.len());
        let mut coefficient_sums = Vec::with_capacity(teams.len());
        let mut schedule = Vec::with_capacity(teams.len());

        for team in teams.ids() {
            let mut home = [team; POT_COUNT];
            let mut away = [team; POT_COUNT];
            for pot in 0..POT_COUNT {
                home[pot] = state
                    .home_opponent_in(team, pot)
                    .ok_or_else(|| missing(teams, team, "home", pot))?;
                away[pot] = state
                    .away_opponent_in(team, pot)
                    .ok_or_else(|| missing(teams, team, "away", pot))?;
            }

            let opponents = home.iter().chain(away.iter()).map(|id| teams.team(*id));
            let (rating, coefficient) = opponents.fold((0.0, 0.0), |(r, c), opp| {
                (r + opp.rating, c + opp.coefficient)
            });
            rating_sums.push(rating);
            coefficient_sums.push(coefficient);
            schedule.push(TeamSchedule { home, away });
        }

        Ok(Self {
            rating_sums,
            coefficient_sums,
            schedule,
        })
    }
}

fn missing(teams: &Teams, team: TeamId, side: &str, pot: usize) -> DrawError {
    DrawError::IncompleteSchedule {
        team: teams.club(team).to_string(),
        detail: format!("no {side} opponent in pot {}", pot_label(pot)),
    }
}

/// One row per requested draw, in draw order; `None` for draws that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawTable {
    pub rows: Vec<Option<DrawRecord>>,
}

impl DrawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.rows.iter().filter(|row| row.is_some()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.completed()
    }

    pub fn records(&self) -> impl Iterator<Item = &DrawRecord> {
        self.rows.iter().flatten()
    }
}

pub struct DrawRunner<'a> {
    teams: &'a Teams,
    oracle: &'a dyn FeasibilityOracle,
    workers: usize,
    seed: Option<u64>,
}

impl<'a> DrawRunner<'a> {
    pub fn new(teams: &'a Teams, oracle: &'a dyn FeasibilityOracle) -> Self {
        Self {
            teams,
            oracle,
            workers: DEFAULT_WORKERS,
            seed: None,
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Draw `n` is seeded with `seed + n`, so a seeded run is reproducible
    /// regardless of scheduling.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Runs `count` independent draws on a pool of at most `workers` threads.
    /// A consistency error in any draw aborts the whole run.
    pub fn run(&self, count: usize) -> Result<DrawTable, DrawError> {
        if count == 0 {
            return Ok(DrawTable::default());
        }

        let threads = count.min(self.workers);
        log::info!("running {count} draw(s) on {threads} worker(s)");
        let rows = with_draw_pool(threads, || {
            (0..count)
                .into_par_iter()
                .map(|n| self.run_one(n))
                .collect::<Result<Vec<_>, DrawError>>()
        })?;

        let table = DrawTable { rows };
        log::info!(
            "completed {} of {} draw(s), {} failed",
            table.completed(),
            table.len(),
            table.failed()
        );
        Ok(table)
    }

    fn run_one(&self, n: usize) -> Result<Option<DrawRecord>, DrawError> {
        let outcome = match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(n as u64));
                run_draw(self.teams, self.oracle, &mut rng)?
            }
            None => run_draw(self.teams, self.oracle, &mut rand::thread_rng())?,
        };

        match outcome {
            DrawOutcome::Completed(state) => {
                log::debug!("draw {n} completed");
                DrawRecord::from_state(self.teams, &state).map(Some)
            }
            DrawOutcome::Failed {
                team,
                opponent_pot,
                committed,
            } => {
                log::info!(
                    "draw {n} failed at {} vs pot {} after {committed} pairing(s)",
                    self.teams.club(team),
                    pot_label(opponent_pot)
                );
                Ok(None)
            }
        }
    }
}

fn with_draw_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(err) => {
            log::warn!("could not build draw pool ({err}); using the global pool");
            action()
        }
    }
}
