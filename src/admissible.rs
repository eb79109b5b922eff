use crate::constraints::{ConstraintState, OpponentPair};
use crate::error::DrawError;
use crate::oracle::{FeasibilityOracle, Verdict};
use crate::teams::{TeamId, Teams, pot_label};

/// Every pairing `team` may still draw from `opponent_pot` without
/// dead-ending the rest of the draw. An empty result means the draw is stuck.
pub fn find_admissible(
    teams: &Teams,
    oracle: &dyn FeasibilityOracle,
    state: &ConstraintState,
    team: TeamId,
    opponent_pot: usize,
) -> Result<Vec<OpponentPair>, DrawError> {
    let fixed_home = state.home_opponent_in(team, opponent_pot);
    let fixed_away = state.away_opponent_in(team, opponent_pot);

    let candidates: Vec<OpponentPair> = match (fixed_home, fixed_away) {
        (Some(home), Some(away)) => {
            return confirm_fixed(teams, oracle, state, team, OpponentPair { home, away })
                .map(|pair| vec![pair]);
        }
        (None, None) => {
            let mut out = Vec::new();
            for home in teams.pot_members(opponent_pot) {
                if !home_side_open(teams, state, team, home) {
                    continue;
                }
                for away in teams.pot_members(opponent_pot) {
                    if away != home && away_side_open(teams, state, team, away) {
                        out.push(OpponentPair { home, away });
                    }
                }
            }
            out
        }
        (None, Some(away)) => teams
            .pot_members(opponent_pot)
            .filter(|home| *home != away && home_side_open(teams, state, team, *home))
            .map(|home| OpponentPair { home, away })
            .collect(),
        (Some(home), None) => teams
            .pot_members(opponent_pot)
            .filter(|away| *away != home && away_side_open(teams, state, team, *away))
            .map(|away| OpponentPair { home, away })
            .collect(),
    };

    let admissible: Vec<OpponentPair> = candidates
        .into_iter()
        .filter(|pair| oracle.is_feasible(teams, state, &pair.fixtures(team)))
        .collect();

    log::debug!(
        "{} vs pot {}: {} admissible pairing(s)",
        teams.club(team),
        pot_label(opponent_pot),
        admissible.len()
    );
    Ok(admissible)
}

/// Whether `team` may still host `opponent`.
fn home_side_open(teams: &Teams, state: &ConstraintState, team: TeamId, opponent: TeamId) -> bool {
    local_rules_allow(teams, state, team, opponent)
        && state.away_opponent_in(opponent, team.pot()).is_none()
}

/// Whether `opponent` may still host `team`.
fn away_side_open(teams: &Teams, state: &ConstraintState, team: TeamId, opponent: TeamId) -> bool {
    local_rules_allow(teams, state, team, opponent)
        && state.home_opponent_in(opponent, team.pot()).is_none()
}

fn local_rules_allow(
    teams: &Teams,
    state: &ConstraintState,
    team: TeamId,
    opponent: TeamId,
) -> bool {
    opponent != team
        && !teams.same_nationality(team, opponent)
        && !state.team(team).has_faced(opponent)
        && !state
            .team(team)
            .at_nationality_cap(teams.nationality_id(opponent))
        && !state
            .team(opponent)
            .at_nationality_cap(teams.nationality_id(team))
}

fn confirm_fixed(
    teams: &Teams,
    oracle: &dyn FeasibilityOracle,
    state: &ConstraintState,
    team: TeamId,
    pair: OpponentPair,
) -> Result<OpponentPair, DrawError> {
    if pair.home == pair.away {
        return Err(DrawError::SameFixedOpponent {
            team: teams.club(team).to_string(),
            opponent: teams.club(pair.home).to_string(),
            pot: pot_label(pair.home.pot()),
        });
    }
    if state.away_opponent_in(pair.home, team.pot()) != Some(team) {
        return Err(DrawError::AsymmetricPairing {
            home: teams.club(team).to_string(),
            away: teams.club(pair.home).to_string(),
            detail: "away side points elsewhere".to_string(),
        });
    }
    if state.home_opponent_in(pair.away, team.pot()) != Some(team) {
        return Err(DrawError::AsymmetricPairing {
            home: teams.club(pair.away).to_string(),
            away: teams.club(team).to_string(),
            detail: "home side points elsewhere".to_string(),
        });
    }

    match oracle.check(teams, state, &pair.fixtures(team)) {
        Verdict::Feasible(_) => Ok(pair),
        Verdict::Infeasible => Err(DrawError::FixedPairingRejected {
            team: teams.club(team).to_string(),
            home: teams.club(pair.home).to_string(),
            away: teams.club(pair.away).to_string(),
        }),
        Verdict::TimedOut | Verdict::Malformed(_) => {
            log::warn!(
                "could not re-confirm committed pairing for {} ({} / {}); keeping it",
                teams.club(team),
                teams.club(pair.home),
                teams.club(pair.away)
            );
            Ok(pair)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Fixture;
    use crate::oracle::SearchOracle;
    use crate::roster;

    #[test]
    fn one_sided_fixed_record_is_fatal() {
        let teams = roster::champions_league_2024().unwrap();
        let oracle = SearchOracle::default();
        let mut state = ConstraintState::new(&teams);
        let real = teams.id_of("Real").unwrap();
        let celtic = teams.id_of("Celtic").unwrap();
        let lille = teams.id_of("Lille").unwrap();

        state.commit(&teams, Fixture::new(lille, real)).unwrap();
        state.record_home_only(Fixture::new(real, celtic));

        let err = find_admissible(&teams, &oracle, &state, real, celtic.pot())
            .expect_err("broken record must abort");
        assert!(matches!(err, DrawError::AsymmetricPairing { .. }));
    }
}
