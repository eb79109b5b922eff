#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use ucl_draw::constraints::{ConstraintState, Fixture};
use ucl_draw::roster;
use ucl_draw::teams::{NATIONALITY_CAP, POT_COUNT, POT_SIZE, Team, TeamId, Teams};

pub fn league_phase() -> Teams {
    roster::champions_league_2024().expect("built-in roster is valid")
}

/// 36 teams, each from a different country.
pub fn unique_nationalities() -> Teams {
    let pots = (0..POT_COUNT)
        .map(|pot| {
            (0..POT_SIZE)
                .map(|pos| {
                    let n = pot * POT_SIZE + pos;
                    Team::new(
                        &format!("Club{n}"),
                        &format!("Country{n}"),
                        1500.0 + n as f64,
                        10.0 + n as f64,
                    )
                })
                .collect()
        })
        .collect();
    Teams::from_pots(pots).expect("valid roster")
}

/// Pot A is made entirely of one country, so the very first step of every
/// draw has nothing to choose from.
pub fn single_country_pot_a() -> Teams {
    let mut pots = roster::champions_league_2024_pots();
    for team in &mut pots[0] {
        team.nationality = "Spain".to_string();
    }
    Teams::from_pots(pots).expect("valid roster")
}

pub fn id(teams: &Teams, club: &str) -> TeamId {
    teams
        .id_of(club)
        .unwrap_or_else(|| panic!("{club} in roster"))
}

/// Checks every rule of a finished draw directly from the fixtures, without
/// going through `ConstraintState::verify_complete`.
pub fn assert_complete_schedule(teams: &Teams, fixtures: &[Fixture]) {
    let mut home: HashMap<TeamId, Vec<TeamId>> = HashMap::new();
    let mut away: HashMap<TeamId, Vec<TeamId>> = HashMap::new();
    let mut pairs = HashSet::new();

    for f in fixtures {
        assert_ne!(f.home, f.away, "{} plays itself", teams.club(f.home));
        assert!(
            !teams.same_nationality(f.home, f.away),
            "{} vs {} share a nationality",
            teams.club(f.home),
            teams.club(f.away)
        );
        let key = (f.home.min(f.away), f.home.max(f.away));
        assert!(
            pairs.insert(key),
            "{} and {} meet twice",
            teams.club(f.home),
            teams.club(f.away)
        );
        home.entry(f.home).or_default().push(f.away);
        away.entry(f.away).or_default().push(f.home);
    }

    for team in teams.ids() {
        let hosted = home.get(&team).cloned().unwrap_or_default();
        let visited = away.get(&team).cloned().unwrap_or_default();
        assert_eq!(hosted.len(), POT_COUNT, "{} home count", teams.club(team));
        assert_eq!(visited.len(), POT_COUNT, "{} away count", teams.club(team));
        for pot in 0..POT_COUNT {
            assert_eq!(hosted.iter().filter(|o| o.pot() == pot).count(), 1);
            assert_eq!(visited.iter().filter(|o| o.pot() == pot).count(), 1);
        }

        let mut per_country: HashMap<&str, u8> = HashMap::new();
        for opp in hosted.iter().chain(visited.iter()) {
            *per_country
                .entry(teams.team(*opp).nationality.as_str())
                .or_default() += 1;
        }
        for (country, count) in per_country {
            assert!(
                count <= NATIONALITY_CAP,
                "{} faces {count} teams from {country}",
                teams.club(team)
            );
        }
    }
}

pub fn assert_symmetric(teams: &Teams, state: &ConstraintState) {
    for a in teams.ids() {
        for b in teams.ids() {
            assert_eq!(
                state.team(a).played_home().contains(&b),
                state.team(b).played_away().contains(&a),
                "{} / {}",
                teams.club(a),
                teams.club(b)
            );
        }
    }
}
