use std::fmt;

use crate::{
    error::{ModelError, Result},
    team::TeamKey,
};

fn clean(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn same_field(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}

/// Canonical cross-referenced identity of a player.
///
/// At least one of league id (GSIS), vendor id (ESPN) or display name is
/// always populated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerIdentity {
    league_id: Option<String>,
    vendor_id: Option<String>,
    display_name: Option<String>,
    team: Option<TeamKey>,
    position: Option<String>,
}

impl PlayerIdentity {
    pub fn new(
        league_id: Option<String>,
        vendor_id: Option<String>,
        display_name: Option<String>,
    ) -> Result<Self> {
        let league_id = clean(league_id);
        let vendor_id = clean(vendor_id);
        let display_name = clean(display_name);
        if league_id.is_none() && vendor_id.is_none() && display_name.is_none()
        {
            return Err(ModelError::EmptyIdentity);
        }
        Ok(Self {
            league_id,
            vendor_id,
            display_name,
            team: None,
            position: None,
        })
    }

    pub fn with_team(mut self, team: Option<TeamKey>) -> Self {
        self.team = team;
        self
    }

    pub fn with_position(mut self, position: Option<String>) -> Self {
        self.position = clean(position);
        self
    }

    pub fn league_id(&self) -> Option<&str> {
        self.league_id.as_deref()
    }

    pub fn vendor_id(&self) -> Option<&str> {
        self.vendor_id.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn team(&self) -> Option<TeamKey> {
        self.team
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    /// Two identities describe the same player when any identifying field
    /// matches, trimmed and case-insensitively.
    pub fn same_subject(&self, other: &PlayerIdentity) -> bool {
        same_field(self.league_id(), other.league_id())
            || same_field(self.vendor_id(), other.vendor_id())
            || same_field(self.display_name(), other.display_name())
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self
            .display_name()
            .or(self.vendor_id())
            .or(self.league_id())
            .unwrap_or("?");
        match self.team {
            Some(team) => write!(f, "{label} ({team})"),
            None => f.write_str(label),
        }
    }
}

/// Partial identity supplied by calling code.
///
/// The team hint is kept raw (`"ARZ"`, `"Cardinals"`); the resolver
/// normalizes it before use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerQuery {
    league_id: Option<String>,
    vendor_id: Option<String>,
    name: Option<String>,
    team_hint: Option<String>,
}

impl PlayerQuery {
    pub fn new(
        league_id: Option<String>,
        vendor_id: Option<String>,
        name: Option<String>,
    ) -> Result<Self> {
        let league_id = clean(league_id);
        let vendor_id = clean(vendor_id);
        let name = clean(name);
        if league_id.is_none() && vendor_id.is_none() && name.is_none() {
            return Err(ModelError::EmptyIdentity);
        }
        Ok(Self {
            league_id,
            vendor_id,
            name,
            team_hint: None,
        })
    }

    pub fn by_name(name: impl Into<String>) -> Result<Self> {
        Self::new(None, None, Some(name.into()))
    }

    pub fn by_vendor_id(vendor_id: impl Into<String>) -> Result<Self> {
        Self::new(None, Some(vendor_id.into()), None)
    }

    pub fn by_league_id(league_id: impl Into<String>) -> Result<Self> {
        Self::new(Some(league_id.into()), None, None)
    }

    pub fn with_team_hint(mut self, team: impl Into<String>) -> Self {
        self.team_hint = clean(Some(team.into()));
        self
    }

    pub fn league_id(&self) -> Option<&str> {
        self.league_id.as_deref()
    }

    pub fn vendor_id(&self) -> Option<&str> {
        self.vendor_id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn team_hint(&self) -> Option<&str> {
        self.team_hint.as_deref()
    }

    pub fn has_id(&self) -> bool {
        self.league_id.is_some() || self.vendor_id.is_some()
    }
}

impl fmt::Display for PlayerQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if let Some(v) = self.vendor_id() {
            parts.push(format!("vendor={v}"));
        }
        if let Some(l) = self.league_id() {
            parts.push(format!("league={l}"));
        }
        if let Some(n) = self.name() {
            parts.push(format!("name={n}"));
        }
        if let Some(t) = self.team_hint() {
            parts.push(format!("team={t}"));
        }
        f.write_str(&parts.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_requires_an_identifying_field() {
        assert_eq!(
            PlayerIdentity::new(None, Some("  ".into()), None),
            Err(ModelError::EmptyIdentity)
        );
        assert!(PlayerIdentity::new(None, None, Some("Josh Allen".into())).is_ok());
    }

    #[test]
    fn same_subject_matches_any_field_case_insensitively() {
        let a = PlayerIdentity::new(
            Some("00-0033873".into()),
            Some("3139477".into()),
            Some("Patrick Mahomes".into()),
        )
        .unwrap();
        let by_name =
            PlayerIdentity::new(None, None, Some(" patrick MAHOMES ".into()))
                .unwrap();
        let other =
            PlayerIdentity::new(None, Some("3918298".into()), None).unwrap();

        assert!(a.same_subject(&by_name));
        assert!(!a.same_subject(&other));
    }

    #[test]
    fn query_display_lists_present_fields() {
        let q = PlayerQuery::by_name("Josh Allen")
            .unwrap()
            .with_team_hint("BUF");
        assert_eq!(q.to_string(), "name=Josh Allen|team=BUF");
        assert!(!q.has_id());
    }
}
