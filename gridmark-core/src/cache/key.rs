use std::fmt;

use gridmark_model::{AssetKind, AssetVariant, HeadshotSize, TeamKey};
use serde::Serialize;

use crate::{
    error::{AssetError, Result},
    identity::clean_vendor_id,
    urls::ResolvedSubject,
};

/// Filesystem-safe identity of one cached file:
/// `<kind dir>/<stem>.<extension>`.
///
/// Teams use their canonical code as stem (`ARI`); players use their vendor
/// id, with a `-small` suffix for the small headshot rendition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CacheKey {
    kind: AssetKind,
    stem: String,
    extension: String,
}

fn is_stem_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl CacheKey {
    pub fn for_team(team: TeamKey, kind: AssetKind, variant: &AssetVariant) -> Self {
        Self {
            kind,
            stem: team.as_str().to_string(),
            extension: variant.extension(),
        }
    }

    pub fn for_player(
        vendor_id: &str,
        size: HeadshotSize,
        variant: &AssetVariant,
    ) -> Result<Self> {
        let id = clean_vendor_id(vendor_id)?;
        let stem = match size {
            HeadshotSize::Full => id,
            HeadshotSize::Small => format!("{id}-small"),
        };
        Ok(Self {
            kind: AssetKind::Headshot,
            stem,
            extension: variant.extension(),
        })
    }

    /// Key for a canonical subject. Players without a vendor id have no
    /// headshot file to name.
    pub fn for_subject(
        subject: &ResolvedSubject,
        kind: AssetKind,
        size: HeadshotSize,
        variant: &AssetVariant,
    ) -> Result<Self> {
        match subject {
            ResolvedSubject::Team(team) => Ok(Self::for_team(*team, kind, variant)),
            ResolvedSubject::Player(identity) => {
                let vendor_id = identity.vendor_id().ok_or_else(|| {
                    AssetError::MissingVendorId {
                        player: identity.to_string(),
                    }
                })?;
                Self::for_player(vendor_id, size, variant)
            }
        }
    }

    /// Inverse of [`CacheKey::file_name`] for directory scans. Returns
    /// `None` for names this cache would never write.
    pub fn from_file_name(kind: AssetKind, name: &str) -> Option<Self> {
        let (stem, extension) = name.rsplit_once('.')?;
        if stem.is_empty()
            || extension.is_empty()
            || !stem.chars().all(is_stem_char)
            || !extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return None;
        }
        Some(Self {
            kind,
            stem: stem.to_string(),
            extension: extension.to_string(),
        })
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, self.extension)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.kind.dir_name(), self.stem, self.extension)
    }
}
