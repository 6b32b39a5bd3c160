use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A player identity or query was built without any identifying field.
    EmptyIdentity,
    /// A string did not name a known team code exactly.
    UnknownTeamCode(String),
    /// A string did not name a known asset kind.
    UnknownAssetKind(String),
    /// A string did not name a known headshot size.
    UnknownHeadshotSize(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EmptyIdentity => write!(
                f,
                "player identity needs a league id, vendor id, or display name"
            ),
            ModelError::UnknownTeamCode(code) => {
                write!(f, "unknown team code: {code}")
            }
            ModelError::UnknownAssetKind(kind) => {
                write!(f, "unknown asset kind: {kind}")
            }
            ModelError::UnknownHeadshotSize(size) => {
                write!(f, "unknown headshot size: {size}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
