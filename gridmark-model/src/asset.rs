use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// Logical categories of branded imagery.
///
/// Each kind owns one subdirectory of the cache root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AssetKind {
    Logo,
    Wordmark,
    Headshot,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] =
        [AssetKind::Logo, AssetKind::Wordmark, AssetKind::Headshot];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Logo => "logo",
            AssetKind::Wordmark => "wordmark",
            AssetKind::Headshot => "headshot",
        }
    }

    /// Name of the cache subdirectory holding this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetKind::Logo => "logos",
            AssetKind::Wordmark => "wordmarks",
            AssetKind::Headshot => "headshots",
        }
    }

    /// Parses singular or plural names using ASCII-case-insensitive
    /// matching (`logo`, `Logos`, ...).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|kind| {
            value.eq_ignore_ascii_case(kind.as_str())
                || value.eq_ignore_ascii_case(kind.dir_name())
        })
    }
}

impl FromStr for AssetKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetKind::parse(s)
            .ok_or_else(|| ModelError::UnknownAssetKind(s.to_string()))
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headshot renditions offered by the vendor CDN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeadshotSize {
    #[default]
    Full,
    Small,
}

impl HeadshotSize {
    pub fn as_str(self) -> &'static str {
        match self {
            HeadshotSize::Full => "full",
            HeadshotSize::Small => "small",
        }
    }

    pub fn other(self) -> Self {
        match self {
            HeadshotSize::Full => HeadshotSize::Small,
            HeadshotSize::Small => HeadshotSize::Full,
        }
    }
}

impl FromStr for HeadshotSize {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("full") {
            Ok(HeadshotSize::Full)
        } else if trimmed.eq_ignore_ascii_case("small") {
            Ok(HeadshotSize::Small)
        } else {
            Err(ModelError::UnknownHeadshotSize(s.to_string()))
        }
    }
}

impl fmt::Display for HeadshotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional size/format hint attached to a request.
///
/// The variant is part of the cache key, so two variants of the same subject
/// never overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetVariant {
    pub size: Option<HeadshotSize>,
    pub format: String,
}

impl AssetVariant {
    pub const DEFAULT_FORMAT: &'static str = "png";

    pub fn with_size(mut self, size: HeadshotSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// File extension used on disk: lowercase ASCII alphanumerics only,
    /// falling back to `png` when nothing usable remains.
    pub fn extension(&self) -> String {
        let ext: String = self
            .format
            .trim_start_matches('.')
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if ext.is_empty() {
            Self::DEFAULT_FORMAT.to_string()
        } else {
            ext
        }
    }
}

impl Default for AssetVariant {
    fn default() -> Self {
        Self {
            size: None,
            format: Self::DEFAULT_FORMAT.to_string(),
        }
    }
}
