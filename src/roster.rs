//! Built-in roster: the 2024/25 Champions League league-phase pots, with Elo
//! ratings and UEFA club coefficients at the time of the draw.

use crate::error::DrawError;
use crate::teams::{Team, Teams};

pub fn champions_league_2024() -> Result<Teams, DrawError> {
    Teams::from_pots(champions_league_2024_pots())
}

pub fn champions_league_2024_pots() -> Vec<Vec<Team>> {
    vec![
        vec![
            Team::new("Real", "Spain", 1985.0, 136.0),
            Team::new("ManCity", "England", 2057.0, 148.0),
            Team::new("Bayern", "Germany", 1904.0, 144.0),
            Team::new("PSG", "France", 1893.0, 116.0),
            Team::new("Liverpool", "England", 1908.0, 114.0),
            Team::new("Inter", "Italy", 1960.0, 101.0),
            Team::new("Dortmund", "Germany", 1874.0, 97.0),
            Team::new("Leipzig", "Germany", 1849.0, 97.0),
            Team::new("Barcelona", "Spain", 1894.0, 91.0),
        ],
        vec![
            Team::new("Leverkusen", "Germany", 1929.0, 90.0),
            Team::new("Atlético", "Spain", 1830.0, 89.0),
            Team::new("Atalanta", "Italy", 1879.0, 81.0),
            Team::new("Juventus", "Italy", 1839.0, 80.0),
            Team::new("Benfica", "Portugal", 1824.0, 79.0),
            Team::new("Arsenal", "England", 1957.0, 72.0),
            Team::new("Brugge", "Belgium", 1703.0, 64.0),
            Team::new("Shakhtar", "Ukraine", 1573.0, 63.0),
            Team::new("Milan", "Italy", 1821.0, 59.0),
        ],
        vec![
            Team::new("Feyenoord", "Netherlands", 1747.0, 57.0),
            Team::new("Sporting", "Portugal", 1824.0, 54.5),
            Team::new("Eindhoven", "Netherlands", 1794.0, 54.0),
            Team::new("Dinamo", "Croatia", 1584.0, 50.0),
            Team::new("Salzburg", "Austria", 1693.0, 50.0),
            Team::new("Lille", "France", 1785.0, 47.0),
            Team::new("Crvena", "Serbia", 1734.0, 40.0),
            Team::new("YB", "Switzerland", 1566.0, 34.5),
            Team::new("Celtic", "Scotland", 1646.0, 32.0),
        ],
        vec![
            Team::new("Bratislava", "Slovakia", 1703.0, 30.5),
            Team::new("Monaco", "France", 1780.0, 24.0),
            Team::new("Sparta", "Czech Republic", 1716.0, 22.5),
            Team::new("Aston Villa", "England", 1772.0, 20.86),
            Team::new("Bologna", "Italy", 1777.0, 18.056),
            Team::new("Girona", "Spain", 1791.0, 17.897),
            Team::new("Stuttgart", "Germany", 1795.0, 17.324),
            Team::new("Sturm Graz", "Austria", 1610.0, 14.5),
            Team::new("Brest", "France", 1685.0, 13.366),
        ],
    ]
}
