use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::DrawError;
use crate::teams::{NATIONALITY_CAP, POT_COUNT, TeamId, Teams, pot_label};

/// A directed pairing: `home` hosts `away`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Fixture {
    pub home: TeamId,
    pub away: TeamId,
}

impl Fixture {
    pub fn new(home: TeamId, away: TeamId) -> Self {
        Self { home, away }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home == team || self.away == team
    }
}

/// Opponents drawn for one team from one pot: the team hosts `home` and
/// travels to `away`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpponentPair {
    pub home: TeamId,
    pub away: TeamId,
}

impl OpponentPair {
    pub fn fixtures(self, team: TeamId) -> [Fixture; 2] {
        [Fixture::new(team, self.home), Fixture::new(self.away, team)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamConstraints {
    played_home: BTreeSet<TeamId>,
    played_away: BTreeSet<TeamId>,
    nationality_count: Vec<u8>,
}

impl TeamConstraints {
    fn new(own_nationality: usize, nationalities: usize) -> Self {
        let mut nationality_count = vec![0; nationalities];
        nationality_count[own_nationality] = NATIONALITY_CAP;
        Self {
            played_home: BTreeSet::new(),
            played_away: BTreeSet::new(),
            nationality_count,
        }
    }

    /// Opponents this team hosts.
    pub fn played_home(&self) -> &BTreeSet<TeamId> {
        &self.played_home
    }

    /// Opponents this team visits.
    pub fn played_away(&self) -> &BTreeSet<TeamId> {
        &self.played_away
    }

    pub fn nationality_count(&self, nationality: usize) -> u8 {
        self.nationality_count.get(nationality).copied().unwrap_or(0)
    }

    pub fn at_nationality_cap(&self, nationality: usize) -> bool {
        self.nationality_count(nationality) >= NATIONALITY_CAP
    }

    pub fn has_faced(&self, opponent: TeamId) -> bool {
        self.played_home.contains(&opponent) || self.played_away.contains(&opponent)
    }
}

/// Everything committed so far in one draw. Owned by exactly one draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintState {
    teams: Vec<TeamConstraints>,
}

impl ConstraintState {
    pub fn new(teams: &Teams) -> Self {
        let nationalities = teams.nationalities().len();
        Self {
            teams: teams
                .ids()
                .map(|id| TeamConstraints::new(teams.nationality_id(id), nationalities))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn team(&self, id: TeamId) -> &TeamConstraints {
        &self.teams[id.index()]
    }

    pub fn nationality_count(&self, teams: &Teams, team: TeamId, nationality: &str) -> u8 {
        teams
            .nationality_id_of(nationality)
            .map(|n| self.team(team).nationality_count(n))
            .unwrap_or(0)
    }

    /// The opponent from `pot` that `team` already hosts, if any.
    pub fn home_opponent_in(&self, team: TeamId, pot: usize) -> Option<TeamId> {
        self.team(team)
            .played_home
            .iter()
            .copied()
            .find(|opp| opp.pot() == pot)
    }

    /// The opponent from `pot` that already hosts `team`, if any.
    pub fn away_opponent_in(&self, team: TeamId, pot: usize) -> Option<TeamId> {
        self.team(team)
            .played_away
            .iter()
            .copied()
            .find(|opp| opp.pot() == pot)
    }

    pub fn fixtures(&self) -> impl Iterator<Item = Fixture> + '_ {
        self.teams.iter().enumerate().flat_map(|(idx, c)| {
            c.played_home
                .iter()
                .map(move |away| Fixture::new(TeamId(idx), *away))
        })
    }

    pub fn committed(&self) -> usize {
        self.teams.iter().map(|c| c.played_home.len()).sum()
    }

    /// Records `fixture` on both teams. Returns `Ok(false)` when both sides
    /// already hold it; a record held by one side only is fatal.
    pub fn commit(&mut self, teams: &Teams, fixture: Fixture) -> Result<bool, DrawError> {
        let Fixture { home, away } = fixture;
        let home_has = self.teams[home.index()].played_home.contains(&away);
        let away_has = self.teams[away.index()].played_away.contains(&home);

        match (home_has, away_has) {
            (true, true) => {
                log::debug!(
                    "pairing {} vs {} already committed",
                    teams.club(home),
                    teams.club(away)
                );
                Ok(false)
            }
            (true, false) => Err(asymmetric(teams, fixture, "recorded at home only")),
            (false, true) => Err(asymmetric(teams, fixture, "recorded away only")),
            (false, false) => {
                if home == away {
                    return Err(asymmetric(teams, fixture, "a team cannot play itself"));
                }
                let home_nat = teams.nationality_id(home);
                let away_nat = teams.nationality_id(away);
                let h = &mut self.teams[home.index()];
                h.nationality_count[away_nat] = h.nationality_count[away_nat].saturating_add(1);
                h.played_home.insert(away);
                let a = &mut self.teams[away.index()];
                a.nationality_count[home_nat] = a.nationality_count[home_nat].saturating_add(1);
                a.played_away.insert(home);
                Ok(true)
            }
        }
    }

    /// Commits both fixtures of `pair` for `team`; returns how many were new.
    pub fn commit_pair(
        &mut self,
        teams: &Teams,
        team: TeamId,
        pair: OpponentPair,
    ) -> Result<usize, DrawError> {
        let mut added = 0;
        for fixture in pair.fixtures(team) {
            if self.commit(teams, fixture)? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn verify_symmetry(&self, teams: &Teams) -> Result<(), DrawError> {
        for (idx, c) in self.teams.iter().enumerate() {
            let team = TeamId(idx);
            for away in &c.played_home {
                if !self.team(*away).played_away.contains(&team) {
                    return Err(asymmetric(
                        teams,
                        Fixture::new(team, *away),
                        "recorded at home only",
                    ));
                }
            }
            for home in &c.played_away {
                if !self.team(*home).played_home.contains(&team) {
                    return Err(asymmetric(
                        teams,
                        Fixture::new(*home, team),
                        "recorded away only",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Checks the invariants of a finished draw.
    pub fn verify_complete(&self, teams: &Teams) -> Result<(), DrawError> {
        self.verify_symmetry(teams)?;

        for (idx, c) in self.teams.iter().enumerate() {
            let team = TeamId(idx);
            let incomplete = |detail: String| DrawError::IncompleteSchedule {
                team: teams.club(team).to_string(),
                detail,
            };

            for pot in 0..POT_COUNT {
                let home = c.played_home.iter().filter(|o| o.pot() == pot).count();
                let away = c.played_away.iter().filter(|o| o.pot() == pot).count();
                if home != 1 || away != 1 {
                    return Err(incomplete(format!(
                        "{home} home and {away} away opponents in pot {}",
                        pot_label(pot)
                    )));
                }
            }

            let mut exposure = vec![0u8; teams.nationalities().len()];
            for opp in c.played_home.iter().chain(c.played_away.iter()) {
                if *opp == team {
                    return Err(incomplete("paired with itself".to_string()));
                }
                if teams.same_nationality(team, *opp) {
                    return Err(incomplete(format!(
                        "paired with compatriot {}",
                        teams.club(*opp)
                    )));
                }
                exposure[teams.nationality_id(*opp)] += 1;
            }
            if let Some(twice) = c.played_home.intersection(&c.played_away).next() {
                return Err(incomplete(format!("faces {} twice", teams.club(*twice))));
            }
            if let Some((nat, count)) = exposure
                .iter()
                .enumerate()
                .find(|(_, count)| **count > NATIONALITY_CAP)
            {
                return Err(incomplete(format!(
                    "{count} opponents from {}",
                    teams.nationalities()[nat]
                )));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn record_home_only(&mut self, fixture: Fixture) {
        self.teams[fixture.home.index()]
            .played_home
            .insert(fixture.away);
    }
}

fn asymmetric(teams: &Teams, fixture: Fixture, detail: &str) -> DrawError {
    DrawError::AsymmetricPairing {
        home: teams.club(fixture.home).to_string(),
        away: teams.club(fixture.away).to_string(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster;

    #[test]
    fn own_nationality_is_seeded_at_cap() {
        let teams = roster::champions_league_2024().unwrap();
        let state = ConstraintState::new(&teams);
        let real = teams.id_of("Real").expect("Real in roster");
        assert_eq!(state.nationality_count(&teams, real, "Spain"), NATIONALITY_CAP);
        assert_eq!(state.nationality_count(&teams, real, "Italy"), 0);
        assert!(state.team(real).at_nationality_cap(teams.nationality_id(real)));
    }

    #[test]
    fn commit_updates_both_sides() {
        let teams = roster::champions_league_2024().unwrap();
        let mut state = ConstraintState::new(&teams);
        let real = teams.id_of("Real").unwrap();
        let inter = teams.id_of("Inter").unwrap();

        assert!(state.commit(&teams, Fixture::new(real, inter)).unwrap());
        assert!(state.team(real).played_home().contains(&inter));
        assert!(state.team(inter).played_away().contains(&real));
        assert_eq!(state.nationality_count(&teams, real, "Italy"), 1);
        assert_eq!(state.nationality_count(&teams, inter, "Spain"), 1);
        assert_eq!(state.committed(), 1);
        assert!(state.verify_symmetry(&teams).is_ok());
    }

    #[test]
    fn recommitting_is_a_no_op() {
        let teams = roster::champions_league_2024().unwrap();
        let mut state = ConstraintState::new(&teams);
        let real = teams.id_of("Real").unwrap();
        let inter = teams.id_of("Inter").unwrap();

        state.commit(&teams, Fixture::new(real, inter)).unwrap();
        let before = state.clone();
        assert!(!state.commit(&teams, Fixture::new(real, inter)).unwrap());
        assert_eq!(state, before);
    }

    #[test]
    fn one_sided_record_is_fatal() {
        let teams = roster::champions_league_2024().unwrap();
        let mut state = ConstraintState::new(&teams);
        let real = teams.id_of("Real").unwrap();
        let inter = teams.id_of("Inter").unwrap();

        state.record_home_only(Fixture::new(real, inter));
        assert!(matches!(
            state.commit(&teams, Fixture::new(real, inter)),
            Err(DrawError::AsymmetricPairing { .. })
        ));
        assert!(state.verify_symmetry(&teams).is_err());
    }

    #[test]
    fn opponents_are_found_by_pot() {
        let teams = roster::champions_league_2024().unwrap();
        let mut state = ConstraintState::new(&teams);
        let real = teams.id_of("Real").unwrap();
        let celtic = teams.id_of("Celtic").unwrap();
        let brest = teams.id_of("Brest").unwrap();

        state.commit(&teams, Fixture::new(real, celtic)).unwrap();
        state.commit(&teams, Fixture::new(brest, real)).unwrap();

        assert_eq!(state.home_opponent_in(real, 2), Some(celtic));
        assert_eq!(state.away_opponent_in(real, 3), Some(brest));
        assert_eq!(state.home_opponent_in(real, 3), None);
        assert_eq!(state.away_opponent_in(celtic, 0), Some(real));
        assert_eq!(state.fixtures().count(), 2);
    }

    #[test]
    fn empty_state_is_not_complete() {
        let teams = roster::champions_league_2024().unwrap();
        let state = ConstraintState::new(&teams);
        assert!(matches!(
            state.verify_complete(&teams),
            Err(DrawError::IncompleteSchedule { .. })
        ));
    }
}
