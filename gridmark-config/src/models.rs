use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use gridmark_model::{AssetKind, HeadshotSize};
use url::Url;

/// Player id cross-reference table published by DynastyProcess; the same
/// file the nflverse tooling loads for id mapping.
pub const DEFAULT_ORACLE_URL: &str = "https://raw.githubusercontent.com/dynastyprocess/data/master/files/db_playerids.csv";

pub const DEFAULT_LOGO_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_WORDMARK_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_HEADSHOT_TIMEOUT: Duration = Duration::from_secs(15);

/// Some image hosts (Wikimedia in particular) reject requests without an
/// identifying agent string.
pub fn default_user_agent() -> String {
    format!(
        "gridmark/{} (+https://github.com/gridmark/gridmark)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Platform cache directory (`~/.cache/gridmark` on Linux), or `./cache`
/// when the platform reports none.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("gridmark"))
        .unwrap_or_else(|| PathBuf::from("./cache"))
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub cache: CacheConfig,
    pub http: HttpConfig,
    pub oracle: OracleConfig,
    pub headshots: HeadshotConfig,
    pub urls: UrlOverrides,
    pub metadata: ConfigMetadata,
}

impl AssetConfig {
    pub fn cache_root(&self) -> &Path {
        &self.cache.root
    }

    pub fn timeout_for(&self, kind: AssetKind) -> Duration {
        self.http.timeout_for(kind)
    }

    /// Make the cache root absolute so the cache location does not depend on
    /// the working directory of later calls.
    pub fn normalize_paths(&mut self) -> std::io::Result<()> {
        if !self.cache.root.is_absolute() {
            self.cache.root = std::env::current_dir()?.join(&self.cache.root);
        }
        Ok(())
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig {
                root: default_cache_root(),
            },
            http: HttpConfig::default(),
            oracle: OracleConfig::default(),
            headshots: HeadshotConfig::default(),
            urls: UrlOverrides::default(),
            metadata: ConfigMetadata::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Root directory; one subdirectory per asset kind lives below it.
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    pub logo_timeout: Duration,
    pub wordmark_timeout: Duration,
    pub headshot_timeout: Duration,
}

impl HttpConfig {
    pub fn timeout_for(&self, kind: AssetKind) -> Duration {
        match kind {
            AssetKind::Logo => self.logo_timeout,
            AssetKind::Wordmark => self.wordmark_timeout,
            AssetKind::Headshot => self.headshot_timeout,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            logo_timeout: DEFAULT_LOGO_TIMEOUT,
            wordmark_timeout: DEFAULT_WORDMARK_TIMEOUT,
            headshot_timeout: DEFAULT_HEADSHOT_TIMEOUT,
        }
    }
}

/// Where the player id oracle is loaded from. A local path wins over the
/// remote URL when both are set.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub path: Option<PathBuf>,
    pub url: Url,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: Url::parse(DEFAULT_ORACLE_URL)
                .expect("default oracle url is valid"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadshotConfig {
    pub default_size: HeadshotSize,
}

/// Per-team URL overrides, keyed by the raw team string from the file.
///
/// Keys are canonicalized by the asset cache when the overrides are applied,
/// so `ARZ` and `Cardinals` both land on `ARI`.
#[derive(Debug, Clone, Default)]
pub struct UrlOverrides {
    pub logos: BTreeMap<String, Url>,
    pub wordmarks: BTreeMap<String, Url>,
}

impl UrlOverrides {
    pub fn is_empty(&self) -> bool {
        self.logos.is_empty() && self.wordmarks.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
