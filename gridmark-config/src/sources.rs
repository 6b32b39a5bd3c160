use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub cache: FileCacheConfig,
    #[serde(default)]
    pub http: FileHttpConfig,
    #[serde(default)]
    pub oracle: FileOracleConfig,
    #[serde(default)]
    pub headshots: FileHeadshotConfig,
    #[serde(default)]
    pub urls: FileUrlConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// Timeouts are humantime strings (`"30s"`, `"1m 30s"`).
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileHttpConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordmark_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headshot_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileOracleConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileHeadshotConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_size: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileUrlConfig {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub logos: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub wordmarks: BTreeMap<String, String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub cache_root: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub logo_timeout: Option<String>,
    pub wordmark_timeout: Option<String>,
    pub headshot_timeout: Option<String>,
    pub oracle_path: Option<PathBuf>,
    pub oracle_url: Option<String>,
    pub headshot_size: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name).filter(|value| !value.trim().is_empty())
        };

        Self {
            config_path: var("GRIDMARK_CONFIG").map(PathBuf::from),
            cache_root: var("GRIDMARK_CACHE_DIR").map(PathBuf::from),
            user_agent: var("GRIDMARK_USER_AGENT"),
            logo_timeout: var("GRIDMARK_LOGO_TIMEOUT"),
            wordmark_timeout: var("GRIDMARK_WORDMARK_TIMEOUT"),
            headshot_timeout: var("GRIDMARK_HEADSHOT_TIMEOUT"),
            oracle_path: var("GRIDMARK_ORACLE_PATH").map(PathBuf::from),
            oracle_url: var("GRIDMARK_ORACLE_URL"),
            headshot_size: var("GRIDMARK_HEADSHOT_SIZE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn blank_variables_are_ignored() {
        let vars: HashMap<&str, &str> = [
            ("GRIDMARK_CACHE_DIR", "/tmp/gm"),
            ("GRIDMARK_USER_AGENT", "   "),
        ]
        .into_iter()
        .collect();

        let env = EnvConfig::from_lookup(|name| {
            vars.get(name).map(|v| v.to_string())
        });

        assert_eq!(env.cache_root, Some(PathBuf::from("/tmp/gm")));
        assert!(env.user_agent.is_none());
        assert!(env.oracle_url.is_none());
    }

    #[test]
    fn file_config_parses_url_tables() {
        let raw = r#"
            [cache]
            root = "/var/cache/gridmark"

            [http]
            logo_timeout = "20s"

            [urls.logos]
            ARZ = "https://example.com/ari.png"
        "#;

        let parsed: FileConfig = toml::from_str(raw).unwrap();
        assert_eq!(
            parsed.cache.root,
            Some(PathBuf::from("/var/cache/gridmark"))
        );
        assert_eq!(parsed.http.logo_timeout.as_deref(), Some("20s"));
        assert_eq!(
            parsed.urls.logos.get("ARZ").map(String::as_str),
            Some("https://example.com/ari.png")
        );
        assert!(parsed.urls.wordmarks.is_empty());
    }
}
