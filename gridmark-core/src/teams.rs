//! Team string normalization.
//!
//! Every spelling a data source might use for a franchise (current codes,
//! relocated-franchise codes, vendor-specific codes, full names and
//! nicknames) maps onto exactly one [`TeamKey`].

use std::collections::HashMap;

use gridmark_model::TeamKey;
use once_cell::sync::Lazy;

use crate::error::{AssetError, Result};

/// Non-canonical codes seen across play-by-play, roster and vendor feeds.
const CODE_ALIASES: &[(&str, TeamKey)] = &[
    ("ARZ", TeamKey::Ari),
    ("BLT", TeamKey::Bal),
    ("CLV", TeamKey::Cle),
    ("GNB", TeamKey::Gb),
    ("HST", TeamKey::Hou),
    ("GBP", TeamKey::Gb),
    ("JAX", TeamKey::Jac),
    ("KAN", TeamKey::Kc),
    ("KCC", TeamKey::Kc),
    ("LA", TeamKey::Lar),
    ("LVR", TeamKey::Lv),
    ("NEP", TeamKey::Ne),
    ("NOR", TeamKey::No),
    ("NOS", TeamKey::No),
    ("NWE", TeamKey::Ne),
    ("OAK", TeamKey::Lv),
    ("SD", TeamKey::Lac),
    ("SDG", TeamKey::Lac),
    ("SFO", TeamKey::Sf),
    ("STL", TeamKey::Lar),
    ("TAM", TeamKey::Tb),
    ("TBB", TeamKey::Tb),
    ("WSH", TeamKey::Was),
];

/// Former franchise names that still show up in historical data.
const HISTORICAL_NAMES: &[(&str, TeamKey)] = &[
    ("OAKLAND RAIDERS", TeamKey::Lv),
    ("SAN DIEGO CHARGERS", TeamKey::Lac),
    ("ST. LOUIS RAMS", TeamKey::Lar),
    ("ST LOUIS RAMS", TeamKey::Lar),
    ("WASHINGTON FOOTBALL TEAM", TeamKey::Was),
];

/// Uppercased, whitespace-collapsed form used as the lookup key.
fn fold(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// Every (folded alias, team) pair before deduplication.
fn alias_entries() -> impl Iterator<Item = (String, TeamKey)> {
    let names = TeamKey::ALL.into_iter().flat_map(|team| {
        let nickname = (!team.is_league_code()).then(|| team.nickname());
        [Some(team.as_str()), Some(team.full_name()), nickname]
            .into_iter()
            .flatten()
            .map(move |alias| (fold(alias), team))
    });
    let aliases = CODE_ALIASES
        .iter()
        .chain(HISTORICAL_NAMES)
        .map(|(alias, team)| (fold(alias), *team));
    names.chain(aliases)
}

static ALIASES: Lazy<HashMap<String, TeamKey>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (alias, team) in alias_entries() {
        let previous = map.insert(alias, team);
        debug_assert!(
            previous.is_none_or(|prev| prev == team),
            "team alias bound to two franchises"
        );
    }
    map
});

/// Map a raw team string to its canonical key.
///
/// Matching is case-insensitive and ignores surrounding and repeated
/// whitespace. Idempotent: normalizing the canonical code of a result yields
/// the same result.
pub fn normalize(raw: &str) -> Result<TeamKey> {
    ALIASES
        .get(&fold(raw))
        .copied()
        .ok_or_else(|| AssetError::UnknownSubject {
            raw: raw.to_string(),
        })
}

/// Normalize a batch of team strings, rejecting the whole batch if any entry
/// is unknown. League codes (`AFC`, `NFC`, `NFL`) are only accepted when
/// `allow_league_codes` is set.
pub fn validate_teams<I, S>(
    teams: I,
    allow_league_codes: bool,
) -> Result<Vec<TeamKey>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for raw in teams {
        let raw = raw.as_ref();
        match normalize(raw) {
            Ok(team) if allow_league_codes || !team.is_league_code() => {
                valid.push(team)
            }
            _ => invalid.push(raw.to_string()),
        }
    }
    if invalid.is_empty() {
        Ok(valid)
    } else {
        Err(AssetError::UnknownSubject {
            raw: invalid.join(", "),
        })
    }
}

/// Every accepted alias string (uppercased), for diagnostics and tests.
pub fn known_aliases() -> impl Iterator<Item = (&'static str, TeamKey)> {
    ALIASES.iter().map(|(alias, team)| (alias.as_str(), *team))
}
