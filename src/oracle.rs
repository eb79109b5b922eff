//! Feasibility oracle: decides whether the committed pairings plus a tentative
//! one can still be completed into a full league-phase schedule.
//!
//! The shipped engine is a depth-first search over the 36 x 4 "who does this
//! team host from pot p" decisions. Every pot-to-pot block of the schedule is a
//! bijection, so the search branches on whichever open slot has the fewest
//! remaining options, looking at both sides of each bijection: a team still
//! missing a home opponent from some pot, or a team still missing a host from
//! some pot. Matchday slots carry no constraint of their own and are left out.
//!
//! Anything short of a found schedule counts as infeasible, including running
//! out of the time budget.

use std::time::{Duration, Instant};

use crate::constraints::{ConstraintState, Fixture};
use crate::teams::{NATIONALITY_CAP, POT_COUNT, POT_SIZE, TEAM_COUNT, TeamId, Teams};

pub const DEFAULT_BUDGET: Duration = Duration::from_secs(10);

/// The clock is read once every this many search nodes.
const CLOCK_CHECK_INTERVAL: u64 = 1024;

const OPEN: u8 = u8::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Feasible(Witness),
    Infeasible,
    TimedOut,
    Malformed(String),
}

impl Verdict {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Verdict::Feasible(_))
    }
}

pub trait FeasibilityOracle: Sync {
    fn check(&self, teams: &Teams, state: &ConstraintState, tentative: &[Fixture]) -> Verdict;

    /// `true` only when a complete schedule was found.
    fn is_feasible(&self, teams: &Teams, state: &ConstraintState, tentative: &[Fixture]) -> bool {
        match self.check(teams, state, tentative) {
            Verdict::Feasible(_) => true,
            Verdict::Infeasible => false,
            Verdict::TimedOut => {
                log::warn!(
                    "feasibility check timed out for {}; treating as infeasible",
                    describe(teams, tentative)
                );
                false
            }
            Verdict::Malformed(reason) => {
                log::warn!("malformed feasibility model: {reason}");
                false
            }
        }
    }
}

/// A complete schedule consistent with everything that was pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    home: Vec<[TeamId; POT_COUNT]>,
}

impl Witness {
    pub fn home_opponent(&self, team: TeamId, pot: usize) -> TeamId {
        self.home[team.index()][pot]
    }

    pub fn contains(&self, fixture: Fixture) -> bool {
        self.home_opponent(fixture.home, fixture.away.pot()) == fixture.away
    }

    pub fn fixtures(&self) -> impl Iterator<Item = Fixture> + '_ {
        self.home.iter().enumerate().flat_map(|(idx, row)| {
            row.iter().map(move |away| Fixture::new(TeamId(idx), *away))
        })
    }
}

#[derive(Debug, Clone)]
pub struct SearchOracle {
    budget: Duration,
}

impl SearchOracle {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

impl Default for SearchOracle {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}

impl FeasibilityOracle for SearchOracle {
    fn check(&self, teams: &Teams, state: &ConstraintState, tentative: &[Fixture]) -> Verdict {
        if teams.len() != TEAM_COUNT {
            return Verdict::Malformed(format!(
                "roster has {} teams, expected {TEAM_COUNT}",
                teams.len()
            ));
        }
        if state.len() != teams.len() {
            return Verdict::Malformed(format!(
                "constraint state tracks {} teams, roster has {}",
                state.len(),
                teams.len()
            ));
        }

        let mut search = Search::new(teams, Instant::now() + self.budget);
        for fixture in state.fixtures().chain(tentative.iter().copied()) {
            if fixture.home.index() >= TEAM_COUNT || fixture.away.index() >= TEAM_COUNT {
                return Verdict::Malformed(format!(
                    "pairing {} vs {} is outside the roster",
                    fixture.home, fixture.away
                ));
            }
            if !search.pin(fixture.home.index(), fixture.away.index()) {
                return Verdict::Infeasible;
            }
        }

        let outcome = search.solve();
        log::trace!(
            "feasibility search for {} visited {} nodes",
            describe(teams, tentative),
            search.nodes
        );
        match outcome {
            Ok(true) => Verdict::Feasible(search.witness()),
            Ok(false) => Verdict::Infeasible,
            Err(OutOfTime) => Verdict::TimedOut,
        }
    }
}

fn describe(teams: &Teams, tentative: &[Fixture]) -> String {
    tentative
        .iter()
        .map(|f| match (teams.get(f.home), teams.get(f.away)) {
            (Some(h), Some(a)) => format!("{} v {}", h.club, a.club),
            _ => format!("{} v {}", f.home, f.away),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

struct OutOfTime;

struct Search {
    nationality: Vec<usize>,
    nationalities: usize,
    // home[i][p]: the team from pot p hosted by i.
    home: [[u8; POT_COUNT]; TEAM_COUNT],
    // host[j][q]: the team from pot q hosting j.
    host: [[u8; POT_COUNT]; TEAM_COUNT],
    // Bitset of teams already paired with i, in either direction.
    paired: [u64; TEAM_COUNT],
    // exposure[i * nationalities + n]: opponents of nationality n faced by i.
    exposure: Vec<u8>,
    deadline: Instant,
    nodes: u64,
}

impl Search {
    fn new(teams: &Teams, deadline: Instant) -> Self {
        let nationalities = teams.nationalities().len();
        Self {
            nationality: teams.ids().map(|id| teams.nationality_id(id)).collect(),
            nationalities,
            home: [[OPEN; POT_COUNT]; TEAM_COUNT],
            host: [[OPEN; POT_COUNT]; TEAM_COUNT],
            paired: [0; TEAM_COUNT],
            exposure: vec![0; TEAM_COUNT * nationalities],
            deadline,
            nodes: 0,
        }
    }

    fn compatible(&self, home: usize, away: usize) -> bool {
        let (nat_home, nat_away) = (self.nationality[home], self.nationality[away]);
        home != away
            && self.paired[home] & (1u64 << away) == 0
            && nat_home != nat_away
            && self.exposure[home * self.nationalities + nat_away] < NATIONALITY_CAP
            && self.exposure[away * self.nationalities + nat_home] < NATIONALITY_CAP
    }

    fn assign(&mut self, home: usize, away: usize) {
        self.home[home][away / POT_SIZE] = away as u8;
        self.host[away][home / POT_SIZE] = home as u8;
        self.paired[home] |= 1u64 << away;
        self.paired[away] |= 1u64 << home;
        self.exposure[home * self.nationalities + self.nationality[away]] += 1;
        self.exposure[away * self.nationalities + self.nationality[home]] += 1;
    }

    fn unassign(&mut self, home: usize, away: usize) {
        self.home[home][away / POT_SIZE] = OPEN;
        self.host[away][home / POT_SIZE] = OPEN;
        self.paired[home] &= !(1u64 << away);
        self.paired[away] &= !(1u64 << home);
        self.exposure[home * self.nationalities + self.nationality[away]] -= 1;
        self.exposure[away * self.nationalities + self.nationality[home]] -= 1;
    }

    /// Forces `home` to host `away`. Pinning the same pairing twice is fine.
    fn pin(&mut self, home: usize, away: usize) -> bool {
        let (home_pot, away_pot) = (home / POT_SIZE, away / POT_SIZE);
        if self.home[home][away_pot] == away as u8 {
            return true;
        }
        if self.home[home][away_pot] != OPEN
            || self.host[away][home_pot] != OPEN
            || !self.compatible(home, away)
        {
            return false;
        }
        self.assign(home, away);
        true
    }

    fn for_each_option(&self, slot: Slot, mut visit: impl FnMut(usize, usize)) {
        match slot {
            Slot::Home(team, pot) => {
                let team_pot = team / POT_SIZE;
                for away in pot * POT_SIZE..(pot + 1) * POT_SIZE {
                    if self.host[away][team_pot] == OPEN && self.compatible(team, away) {
                        visit(team, away);
                    }
                }
            }
            Slot::Host(team, pot) => {
                let team_pot = team / POT_SIZE;
                for home in pot * POT_SIZE..(pot + 1) * POT_SIZE {
                    if self.home[home][team_pot] == OPEN && self.compatible(home, team) {
                        visit(home, team);
                    }
                }
            }
        }
    }

    fn option_count(&self, slot: Slot) -> usize {
        let mut count = 0;
        self.for_each_option(slot, |_, _| count += 1);
        count
    }

    fn options(&self, slot: Slot) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(POT_SIZE);
        self.for_each_option(slot, |home, away| out.push((home, away)));
        out
    }

    /// Picks the open slot with the fewest options and lists them as
    /// `(home, away)` pairings. `None` once every slot is filled.
    fn branch(&self) -> Option<Vec<(usize, usize)>> {
        let mut best: Option<(usize, Slot)> = None;

        for team in 0..TEAM_COUNT {
            for pot in 0..POT_COUNT {
                for slot in [Slot::Home(team, pot), Slot::Host(team, pot)] {
                    let open = match slot {
                        Slot::Home(..) => self.home[team][pot] == OPEN,
                        Slot::Host(..) => self.host[team][pot] == OPEN,
                    };
                    if !open {
                        continue;
                    }
                    let count = self.option_count(slot);
                    if count <= 1 {
                        return Some(self.options(slot));
                    }
                    if best.is_none_or(|(c, _)| count < c) {
                        best = Some((count, slot));
                    }
                }
            }
        }

        best.map(|(_, slot)| self.options(slot))
    }

    fn solve(&mut self) -> Result<bool, OutOfTime> {
        self.nodes += 1;
        if self.nodes % CLOCK_CHECK_INTERVAL == 1 && Instant::now() >= self.deadline {
            return Err(OutOfTime);
        }

        let Some(options) = self.branch() else {
            return Ok(true);
        };
        for (home, away) in options {
            self.assign(home, away);
            if self.solve()? {
                return Ok(true);
            }
            self.unassign(home, away);
        }
        Ok(false)
    }

    fn witness(&self) -> Witness {
        Witness {
            home: self
                .home
                .iter()
                .map(|row| row.map(|away| TeamId(away as usize)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Home(usize, usize),
    Host(usize, usize),
}
