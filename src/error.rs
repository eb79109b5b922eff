use thiserror::Error;

/// Fatal conditions. A draw that merely runs out of admissible pairings is not
/// an error; see `draw::DrawOutcome::Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("invalid roster: {0}")]
    InvalidRoster(String),

    #[error("asymmetric pairing {home} vs {away}: {detail}")]
    AsymmetricPairing {
        home: String,
        away: String,
        detail: String,
    },

    #[error("{team} has the same fixed home and away opponent {opponent} in pot {pot}")]
    SameFixedOpponent {
        team: String,
        opponent: String,
        pot: char,
    },

    #[error("already committed pairing for {team} ({home} at home, {away} away) has no completion")]
    FixedPairingRejected {
        team: String,
        home: String,
        away: String,
    },

    #[error("schedule incomplete for {team}: {detail}")]
    IncompleteSchedule { team: String, detail: String },
}
