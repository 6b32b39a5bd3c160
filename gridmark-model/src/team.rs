use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;

/// Canonical team code.
///
/// Thirty-two franchise codes plus the wildcard league codes `AFC`, `NFC`
/// and `NFL`. Every franchise has exactly one canonical code; historical and
/// vendor-specific spellings are folded onto these by the normalizer in
/// `gridmark-core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TeamKey {
    Ari,
    Atl,
    Bal,
    Buf,
    Car,
    Chi,
    Cin,
    Cle,
    Dal,
    Den,
    Det,
    Gb,
    Hou,
    Ind,
    Jac,
    Kc,
    Lac,
    Lar,
    Lv,
    Mia,
    Min,
    Ne,
    No,
    Nyg,
    Nyj,
    Phi,
    Pit,
    Sea,
    Sf,
    Tb,
    Ten,
    Was,
    Afc,
    Nfc,
    Nfl,
}

/// Conference of a franchise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Conference {
    Afc,
    Nfc,
}

impl Conference {
    pub fn as_str(self) -> &'static str {
        match self {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        }
    }

    /// Parses `AFC` / `NFC`, ignoring ASCII case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("afc") {
            Some(Conference::Afc)
        } else if value.eq_ignore_ascii_case("nfc") {
            Some(Conference::Nfc)
        } else {
            None
        }
    }

    /// The wildcard team code standing in for the whole conference.
    pub fn team_key(self) -> TeamKey {
        match self {
            Conference::Afc => TeamKey::Afc,
            Conference::Nfc => TeamKey::Nfc,
        }
    }
}

impl Display for Conference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    East,
    North,
    South,
    West,
}

/// Division of a franchise, e.g. `AFC East`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Division {
    pub conference: Conference,
    pub region: Region,
}

impl Display for Division {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let region = match self.region {
            Region::East => "East",
            Region::North => "North",
            Region::South => "South",
            Region::West => "West",
        };
        write!(f, "{} {}", self.conference, region)
    }
}

/// Static descriptive data for a canonical code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamInfo {
    pub key: TeamKey,
    pub code: &'static str,
    pub full_name: &'static str,
    /// Franchise nickname (`Cardinals`); league codes repeat their full name.
    pub nickname: &'static str,
    pub division: Option<Division>,
}

const fn div(conference: Conference, region: Region) -> Option<Division> {
    Some(Division { conference, region })
}

const fn info(
    key: TeamKey,
    code: &'static str,
    full_name: &'static str,
    nickname: &'static str,
    division: Option<Division>,
) -> TeamInfo {
    TeamInfo {
        key,
        code,
        full_name,
        nickname,
        division,
    }
}

use Conference::{Afc as A, Nfc as N};
use Region::{East, North, South, West};

// Indexed by `TeamKey as usize`.
static TEAM_INFO: [TeamInfo; 35] = [
    info(TeamKey::Ari, "ARI", "Arizona Cardinals", "Cardinals", div(N, West)),
    info(TeamKey::Atl, "ATL", "Atlanta Falcons", "Falcons", div(N, South)),
    info(TeamKey::Bal, "BAL", "Baltimore Ravens", "Ravens", div(A, North)),
    info(TeamKey::Buf, "BUF", "Buffalo Bills", "Bills", div(A, East)),
    info(TeamKey::Car, "CAR", "Carolina Panthers", "Panthers", div(N, South)),
    info(TeamKey::Chi, "CHI", "Chicago Bears", "Bears", div(N, North)),
    info(TeamKey::Cin, "CIN", "Cincinnati Bengals", "Bengals", div(A, North)),
    info(TeamKey::Cle, "CLE", "Cleveland Browns", "Browns", div(A, North)),
    info(TeamKey::Dal, "DAL", "Dallas Cowboys", "Cowboys", div(N, East)),
    info(TeamKey::Den, "DEN", "Denver Broncos", "Broncos", div(A, West)),
    info(TeamKey::Det, "DET", "Detroit Lions", "Lions", div(N, North)),
    info(TeamKey::Gb, "GB", "Green Bay Packers", "Packers", div(N, North)),
    info(TeamKey::Hou, "HOU", "Houston Texans", "Texans", div(A, South)),
    info(TeamKey::Ind, "IND", "Indianapolis Colts", "Colts", div(A, South)),
    info(TeamKey::Jac, "JAC", "Jacksonville Jaguars", "Jaguars", div(A, South)),
    info(TeamKey::Kc, "KC", "Kansas City Chiefs", "Chiefs", div(A, West)),
    info(TeamKey::Lac, "LAC", "Los Angeles Chargers", "Chargers", div(A, West)),
    info(TeamKey::Lar, "LAR", "Los Angeles Rams", "Rams", div(N, West)),
    info(TeamKey::Lv, "LV", "Las Vegas Raiders", "Raiders", div(A, West)),
    info(TeamKey::Mia, "MIA", "Miami Dolphins", "Dolphins", div(A, East)),
    info(TeamKey::Min, "MIN", "Minnesota Vikings", "Vikings", div(N, North)),
    info(TeamKey::Ne, "NE", "New England Patriots", "Patriots", div(A, East)),
    info(TeamKey::No, "NO", "New Orleans Saints", "Saints", div(N, South)),
    info(TeamKey::Nyg, "NYG", "New York Giants", "Giants", div(N, East)),
    info(TeamKey::Nyj, "NYJ", "New York Jets", "Jets", div(A, East)),
    info(TeamKey::Phi, "PHI", "Philadelphia Eagles", "Eagles", div(N, East)),
    info(TeamKey::Pit, "PIT", "Pittsburgh Steelers", "Steelers", div(A, North)),
    info(TeamKey::Sea, "SEA", "Seattle Seahawks", "Seahawks", div(N, West)),
    info(TeamKey::Sf, "SF", "San Francisco 49ers", "49ers", div(N, West)),
    info(TeamKey::Tb, "TB", "Tampa Bay Buccaneers", "Buccaneers", div(N, South)),
    info(TeamKey::Ten, "TEN", "Tennessee Titans", "Titans", div(A, South)),
    info(TeamKey::Was, "WAS", "Washington Commanders", "Commanders", div(N, East)),
    info(
        TeamKey::Afc,
        "AFC",
        "American Football Conference",
        "American Football Conference",
        None,
    ),
    info(
        TeamKey::Nfc,
        "NFC",
        "National Football Conference",
        "National Football Conference",
        None,
    ),
    info(
        TeamKey::Nfl,
        "NFL",
        "National Football League",
        "National Football League",
        None,
    ),
];

impl TeamKey {
    /// Every canonical code, franchises first, in alphabetical code order.
    pub const ALL: [TeamKey; 35] = [
        TeamKey::Ari,
        TeamKey::Atl,
        TeamKey::Bal,
        TeamKey::Buf,
        TeamKey::Car,
        TeamKey::Chi,
        TeamKey::Cin,
        TeamKey::Cle,
        TeamKey::Dal,
        TeamKey::Den,
        TeamKey::Det,
        TeamKey::Gb,
        TeamKey::Hou,
        TeamKey::Ind,
        TeamKey::Jac,
        TeamKey::Kc,
        TeamKey::Lac,
        TeamKey::Lar,
        TeamKey::Lv,
        TeamKey::Mia,
        TeamKey::Min,
        TeamKey::Ne,
        TeamKey::No,
        TeamKey::Nyg,
        TeamKey::Nyj,
        TeamKey::Phi,
        TeamKey::Pit,
        TeamKey::Sea,
        TeamKey::Sf,
        TeamKey::Tb,
        TeamKey::Ten,
        TeamKey::Was,
        TeamKey::Afc,
        TeamKey::Nfc,
        TeamKey::Nfl,
    ];

    /// The 32 franchises, without league codes.
    pub fn all_teams() -> &'static [TeamKey] {
        &Self::ALL[..32]
    }

    pub fn info(self) -> &'static TeamInfo {
        &TEAM_INFO[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.info().code
    }

    pub fn full_name(self) -> &'static str {
        self.info().full_name
    }

    pub fn nickname(self) -> &'static str {
        self.info().nickname
    }

    pub fn division(self) -> Option<Division> {
        self.info().division
    }

    pub fn conference(self) -> Option<Conference> {
        match self {
            TeamKey::Afc => Some(Conference::Afc),
            TeamKey::Nfc => Some(Conference::Nfc),
            TeamKey::Nfl => None,
            team => team.division().map(|d| d.conference),
        }
    }

    /// `AFC`, `NFC` and `NFL` stand for a group of teams rather than one.
    pub fn is_league_code(self) -> bool {
        matches!(self, TeamKey::Afc | TeamKey::Nfc | TeamKey::Nfl)
    }

    /// Franchises of one conference, in code order.
    pub fn conference_members(conference: Conference) -> Vec<TeamKey> {
        Self::all_teams()
            .iter()
            .copied()
            .filter(|team| team.conference() == Some(conference))
            .collect()
    }

    /// Franchises of one division, in code order.
    pub fn division_members(division: Division) -> Vec<TeamKey> {
        Self::all_teams()
            .iter()
            .copied()
            .filter(|team| team.division() == Some(division))
            .collect()
    }

    /// Exact canonical code lookup, ignoring ASCII case and surrounding
    /// whitespace. Aliases such as `ARZ` are not accepted here.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|team| team.as_str().eq_ignore_ascii_case(code))
    }
}

impl Display for TeamKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TeamKey::from_code(s)
            .ok_or_else(|| ModelError::UnknownTeamCode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_table_is_indexed_by_discriminant() {
        for team in TeamKey::ALL {
            assert_eq!(team.info().key, team);
        }
    }

    #[test]
    fn conferences_split_evenly() {
        assert_eq!(TeamKey::conference_members(Conference::Afc).len(), 16);
        assert_eq!(TeamKey::conference_members(Conference::Nfc).len(), 16);
    }

    #[test]
    fn every_division_has_four_teams() {
        for team in TeamKey::all_teams() {
            let division = team.division().expect("franchise has a division");
            assert_eq!(TeamKey::division_members(division).len(), 4);
        }
    }

    #[test]
    fn from_code_accepts_canonical_codes_only() {
        assert_eq!(TeamKey::from_code(" ari "), Some(TeamKey::Ari));
        assert_eq!(TeamKey::from_code("nfl"), Some(TeamKey::Nfl));
        assert_eq!(TeamKey::from_code("ARZ"), None);
        assert!("OAK".parse::<TeamKey>().is_err());
    }

    #[test]
    fn division_display_reads_naturally() {
        assert_eq!(TeamKey::Gb.division().unwrap().to_string(), "NFC North");
        assert!(TeamKey::Nfl.division().is_none());
        assert_eq!(TeamKey::Afc.conference(), Some(Conference::Afc));
    }
}
