use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::DrawError;

pub const POT_COUNT: usize = 4;
pub const POT_SIZE: usize = 9;
pub const TEAM_COUNT: usize = POT_COUNT * POT_SIZE;

/// Most opponents a team may face from any one nationality.
pub const NATIONALITY_CAP: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub club: String,
    pub nationality: String,
    pub rating: f64,
    pub coefficient: f64,
}

impl Team {
    pub fn new(club: &str, nationality: &str, rating: f64, coefficient: f64) -> Self {
        Self {
            club: club.to_string(),
            nationality: nationality.to_string(),
            rating,
            coefficient,
        }
    }
}

/// Stable 0-based position of a team: `pot * 9 + position_in_pot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub usize);

impl TeamId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn pot(self) -> usize {
        self.0 / POT_SIZE
    }

    pub fn position(self) -> usize {
        self.0 % POT_SIZE
    }

    /// 1-based number used in the match artifacts.
    pub fn club_number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.club_number())
    }
}

/// Bijection between club identifiers and their 1-based index in `[1, 36]`.
#[derive(Debug, Clone)]
pub struct ClubIndex {
    by_club: HashMap<String, usize>,
    clubs: Vec<String>,
}

impl ClubIndex {
    fn build(teams: &[Team]) -> Self {
        let clubs: Vec<String> = teams.iter().map(|t| t.club.clone()).collect();
        let by_club = clubs
            .iter()
            .enumerate()
            .map(|(idx, club)| (club.clone(), idx + 1))
            .collect();
        Self { by_club, clubs }
    }

    pub fn index_of(&self, club: &str) -> Option<usize> {
        self.by_club.get(club).copied()
    }

    pub fn club_at(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.clubs.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.clubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    pots: Vec<Vec<Team>>,
}

/// The four pots of a draw, flattened in index order, with lookups.
#[derive(Debug, Clone)]
pub struct Teams {
    teams: Vec<Team>,
    club_index: ClubIndex,
    nationalities: Vec<String>,
    nationality_of: Vec<usize>,
}

impl Teams {
    pub fn from_pots(pots: Vec<Vec<Team>>) -> Result<Self, DrawError> {
        if pots.len() != POT_COUNT {
            return Err(DrawError::InvalidRoster(format!(
                "expected {POT_COUNT} pots, got {}",
                pots.len()
            )));
        }
        for (rank, pot) in pots.iter().enumerate() {
            if pot.len() != POT_SIZE {
                return Err(DrawError::InvalidRoster(format!(
                    "pot {} has {} teams, expected {POT_SIZE}",
                    pot_label(rank),
                    pot.len()
                )));
            }
        }

        let teams: Vec<Team> = pots.into_iter().flatten().collect();
        let mut seen = HashMap::new();
        for (idx, team) in teams.iter().enumerate() {
            if team.club.trim().is_empty() {
                return Err(DrawError::InvalidRoster(format!(
                    "team at index {} has an empty club name",
                    idx + 1
                )));
            }
            if let Some(prev) = seen.insert(team.club.as_str(), idx) {
                return Err(DrawError::InvalidRoster(format!(
                    "club {} appears twice (indices {} and {})",
                    team.club,
                    prev + 1,
                    idx + 1
                )));
            }
        }

        let mut nationalities: Vec<String> = Vec::new();
        let mut nationality_of = Vec::with_capacity(teams.len());
        for team in &teams {
            let id = match nationalities.iter().position(|n| *n == team.nationality) {
                Some(id) => id,
                None => {
                    nationalities.push(team.nationality.clone());
                    nationalities.len() - 1
                }
            };
            nationality_of.push(id);
        }

        let club_index = ClubIndex::build(&teams);
        Ok(Self {
            teams,
            club_index,
            nationalities,
            nationality_of,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let roster: RosterFile = serde_json::from_str(raw).context("parse roster json")?;
        Ok(Self::from_pots(roster.pots)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read roster {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("load roster {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id.index()]
    }

    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        (0..self.teams.len()).map(TeamId)
    }

    pub fn id_of(&self, club: &str) -> Option<TeamId> {
        self.club_index.index_of(club).map(|n| TeamId(n - 1))
    }

    pub fn by_club(&self, club: &str) -> Option<&Team> {
        self.id_of(club).map(|id| self.team(id))
    }

    pub fn club_index(&self) -> &ClubIndex {
        &self.club_index
    }

    pub fn pot_of(&self, id: TeamId) -> usize {
        id.pot()
    }

    pub fn pot_members(&self, pot: usize) -> impl Iterator<Item = TeamId> {
        (pot * POT_SIZE..(pot + 1) * POT_SIZE).map(TeamId)
    }

    pub fn pot(&self, pot: usize) -> &[Team] {
        &self.teams[pot * POT_SIZE..(pot + 1) * POT_SIZE]
    }

    pub fn nationalities(&self) -> &[String] {
        &self.nationalities
    }

    pub fn nationality_id(&self, id: TeamId) -> usize {
        self.nationality_of[id.index()]
    }

    pub fn nationality_id_of(&self, nationality: &str) -> Option<usize> {
        self.nationalities.iter().position(|n| n == nationality)
    }

    pub fn same_nationality(&self, a: TeamId, b: TeamId) -> bool {
        self.nationality_id(a) == self.nationality_id(b)
    }

    pub fn club(&self, id: TeamId) -> &str {
        &self.team(id).club
    }
}

pub fn pot_label(pot: usize) -> char {
    (b'A' + pot as u8) as char
}
