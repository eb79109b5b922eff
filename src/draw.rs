use rand::Rng;
use rand::seq::SliceRandom;

use crate::admissible::find_admissible;
use crate::constraints::ConstraintState;
use crate::error::DrawError;
use crate::oracle::FeasibilityOracle;
use crate::teams::{POT_COUNT, TeamId, Teams, pot_label};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    Completed(ConstraintState),
    /// No admissible pairing was left for `team` against `opponent_pot`.
    Failed {
        team: TeamId,
        opponent_pot: usize,
        committed: usize,
    },
}

impl DrawOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DrawOutcome::Completed(_))
    }

    pub fn state(&self) -> Option<&ConstraintState> {
        match self {
            DrawOutcome::Completed(state) => Some(state),
            DrawOutcome::Failed { .. } => None,
        }
    }
}

/// Runs one draw to completion or to its first dead end. Pots are visited in
/// order, the teams of each pot in a fresh random order, and for each team the
/// opponent pots in order.
pub fn run_draw<R: Rng + ?Sized>(
    teams: &Teams,
    oracle: &dyn FeasibilityOracle,
    rng: &mut R,
) -> Result<DrawOutcome, DrawError> {
    let mut state = ConstraintState::new(teams);

    for pot in 0..POT_COUNT {
        let mut order: Vec<TeamId> = teams.pot_members(pot).collect();
        order.shuffle(rng);

        for team in order {
            for opponent_pot in 0..POT_COUNT {
                let candidates = find_admissible(teams, oracle, &state, team, opponent_pot)?;
                let Some(pair) = candidates.choose(rng).copied() else {
                    log::info!(
                        "no admissible pairing for {} in pot {}; abandoning draw",
                        teams.club(team),
                        pot_label(opponent_pot)
                    );
                    return Ok(DrawOutcome::Failed {
                        team,
                        opponent_pot,
                        committed: state.committed(),
                    });
                };
                state.commit_pair(teams, team, pair)?;
            }
        }
    }

    state.verify_complete(teams)?;
    Ok(DrawOutcome::Completed(state))
}
