use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use gridmark_model::HeadshotSize;

use crate::{
    models::{
        AssetConfig, CacheConfig, ConfigMetadata, HeadshotConfig, HttpConfig,
        OracleConfig, UrlOverrides, default_cache_root, default_user_agent,
    },
    sources::{EnvConfig, FileConfig, FileUrlConfig},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("gridmark.toml"),
        PathBuf::from("config/gridmark.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Use these values instead of reading the process environment.
    pub env: Option<EnvConfig>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.options.env = Some(env);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env_config, env_file_loaded) = match &self.options.env {
            Some(env) => (env.clone(), false),
            None => {
                let loaded = self.load_env_file()?;
                (EnvConfig::gather(), loaded)
            }
        };

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let mut warnings = ConfigWarnings::default();
        if config_path.is_none() {
            warnings.push_with_hint(
                "No gridmark.toml detected; using environment variables and defaults",
                "Create gridmark.toml or set GRIDMARK_CONFIG to pin the cache location",
            );
        }

        let config = compose_config(
            file_config.unwrap_or_default(),
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        )?;

        debug!(
            cache_root = %config.cache.root.display(),
            "gridmark configuration loaded"
        );

        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };
        match loaded {
            Ok(loaded) => Ok(loaded),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.clone(),
                None => return Ok((None, None)),
            },
        };

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

fn compose_config(
    file: FileConfig,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<AssetConfig, ConfigLoadError> {
    let FileConfig {
        cache: file_cache,
        http: file_http,
        oracle: file_oracle,
        headshots: file_headshots,
        urls: file_urls,
    } = file;

    let cache = CacheConfig {
        root: env
            .cache_root
            .or(file_cache.root)
            .unwrap_or_else(default_cache_root),
    };

    let defaults = HttpConfig::default();
    let http = HttpConfig {
        user_agent: env
            .user_agent
            .or(file_http.user_agent)
            .unwrap_or_else(default_user_agent),
        logo_timeout: resolve_duration(
            "logo_timeout",
            env.logo_timeout.or(file_http.logo_timeout),
            defaults.logo_timeout,
        )?,
        wordmark_timeout: resolve_duration(
            "wordmark_timeout",
            env.wordmark_timeout.or(file_http.wordmark_timeout),
            defaults.wordmark_timeout,
        )?,
        headshot_timeout: resolve_duration(
            "headshot_timeout",
            env.headshot_timeout.or(file_http.headshot_timeout),
            defaults.headshot_timeout,
        )?,
    };

    let oracle_url = match env.oracle_url.or(file_oracle.url) {
        Some(raw) => parse_url("oracle.url", &raw)?,
        None => OracleConfig::default().url,
    };
    let oracle = OracleConfig {
        path: env.oracle_path.or(file_oracle.path),
        url: oracle_url,
    };

    let headshots = match env.headshot_size.or(file_headshots.default_size) {
        Some(raw) => HeadshotConfig {
            default_size: raw.parse::<HeadshotSize>().map_err(|_| {
                ConfigLoadError::InvalidValue {
                    field: "headshots.default_size",
                    value: raw.clone(),
                }
            })?,
        },
        None => HeadshotConfig::default(),
    };

    let urls = resolve_url_overrides(file_urls)?;

    let mut config = AssetConfig {
        cache,
        http,
        oracle,
        headshots,
        urls,
        metadata,
    };
    config
        .normalize_paths()
        .map_err(|source| ConfigLoadError::Filesystem { source })?;

    Ok(config)
}

fn resolve_duration(
    field: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    match raw {
        None => Ok(default),
        Some(raw) => {
            let parsed = humantime::parse_duration(raw.trim()).map_err(
                |source| ConfigLoadError::InvalidDuration {
                    field,
                    value: raw.clone(),
                    source,
                },
            )?;
            if parsed.is_zero() {
                return Err(ConfigLoadError::InvalidValue {
                    field,
                    value: raw,
                });
            }
            Ok(parsed)
        }
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigLoadError> {
    let url = Url::parse(raw.trim()).map_err(|source| {
        ConfigLoadError::InvalidUrl {
            field: field.to_string(),
            value: raw.to_string(),
            source,
        }
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigLoadError::UnsupportedScheme {
            field: field.to_string(),
            value: raw.to_string(),
        });
    }
    Ok(url)
}

fn resolve_url_table(
    section: &str,
    table: BTreeMap<String, String>,
) -> Result<BTreeMap<String, Url>, ConfigLoadError> {
    table
        .into_iter()
        .map(|(team, raw)| {
            let url = parse_url(&format!("urls.{section}.{team}"), &raw)?;
            Ok((team, url))
        })
        .collect()
}

fn resolve_url_overrides(
    urls: FileUrlConfig,
) -> Result<UrlOverrides, ConfigLoadError> {
    Ok(UrlOverrides {
        logos: resolve_url_table("logos", urls.logos)?,
        wordmarks: resolve_url_table("wordmarks", urls.wordmarks)?,
    })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid duration for {field}: '{value}'")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid value for {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },
    #[error("invalid URL for {field}: '{value}'")]
    InvalidUrl {
        field: String,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL for {field} must use http or https: '{value}'")]
    UnsupportedScheme { field: String, value: String },
    #[error("failed to resolve cache directory")]
    Filesystem {
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: AssetConfig,
    pub warnings: ConfigWarnings,
}

/// Convenience for callers that only need the resolved config.
pub fn load_from_path(path: &Path) -> Result<AssetConfig, ConfigLoadError> {
    ConfigLoader::new()
        .with_config_path(path)
        .load()
        .map(|load| load.config)
}
