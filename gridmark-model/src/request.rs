use std::fmt;

use crate::{
    asset::{AssetKind, AssetVariant, HeadshotSize},
    player::PlayerQuery,
    team::TeamKey,
};

/// Who an asset is about, as named by calling code.
///
/// Team names are carried raw; canonicalization happens in the cache so that
/// an unknown name surfaces as a typed error from `get`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "value", rename_all = "snake_case")
)]
pub enum AssetSubject {
    Team(String),
    Player(PlayerQuery),
}

impl From<TeamKey> for AssetSubject {
    fn from(team: TeamKey) -> Self {
        AssetSubject::Team(team.as_str().to_string())
    }
}

impl From<PlayerQuery> for AssetSubject {
    fn from(query: PlayerQuery) -> Self {
        AssetSubject::Player(query)
    }
}

impl fmt::Display for AssetSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSubject::Team(raw) => write!(f, "team:{raw}"),
            AssetSubject::Player(query) => write!(f, "player:{query}"),
        }
    }
}

/// A request for one rendition of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetRequest {
    pub subject: AssetSubject,
    pub kind: AssetKind,
    pub variant: AssetVariant,
}

impl AssetRequest {
    pub fn new(subject: impl Into<AssetSubject>, kind: AssetKind) -> Self {
        Self {
            subject: subject.into(),
            kind,
            variant: AssetVariant::default(),
        }
    }

    pub fn team(team: impl Into<String>, kind: AssetKind) -> Self {
        Self::new(AssetSubject::Team(team.into()), kind)
    }

    pub fn logo(team: impl Into<String>) -> Self {
        Self::team(team, AssetKind::Logo)
    }

    pub fn wordmark(team: impl Into<String>) -> Self {
        Self::team(team, AssetKind::Wordmark)
    }

    pub fn headshot(query: PlayerQuery) -> Self {
        Self::new(query, AssetKind::Headshot)
    }

    pub fn with_variant(mut self, variant: AssetVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_size(mut self, size: HeadshotSize) -> Self {
        self.variant.size = Some(size);
        self
    }
}

impl fmt::Display for AssetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.subject, self.kind)?;
        if let Some(size) = self.variant.size {
            write!(f, " ({size})")?;
        }
        Ok(())
    }
}
