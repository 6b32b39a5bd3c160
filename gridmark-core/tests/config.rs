use std::fs;

use gridmark_config::AssetConfig;
use gridmark_core::{AssetCache, AssetError, HeadshotSize, TeamKey};
use tempfile::TempDir;
use url::Url;

mod support;

fn config_in(dir: &TempDir) -> AssetConfig {
    let mut config = AssetConfig::default();
    config.cache.root = dir.path().join("cache");
    let oracle = dir.path().join("ids.csv");
    fs::write(&oracle, support::ORACLE_CSV).unwrap();
    config.oracle.path = Some(oracle);
    config
}

#[tokio::test]
async fn from_config_uses_local_oracle_and_overrides() {
    support::init_tracing();
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.headshots.default_size = HeadshotSize::Small;
    config.urls.logos.insert(
        "Cardinals".to_string(),
        Url::parse("https://cdn.example.com/ari.png").unwrap(),
    );

    let cache = AssetCache::from_config(&config).unwrap();
    assert_eq!(cache.root(), dir.path().join("cache"));
    assert_eq!(cache.urls().default_headshot_size(), HeadshotSize::Small);
    assert_eq!(
        cache.urls().logo_url(TeamKey::Ari).map(Url::as_str),
        Some("https://cdn.example.com/ari.png")
    );
    // Untouched teams keep the built-in table.
    assert!(cache.urls().logo_url(TeamKey::Kc).is_some());

    let vendor = cache.resolver().league_to_vendor("00-0033873").await.unwrap();
    assert_eq!(vendor.as_deref(), Some("3139477"));
}

#[test]
fn unknown_override_team_fails_construction() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.urls.wordmarks.insert(
        "Oilers".to_string(),
        Url::parse("https://cdn.example.com/oilers.png").unwrap(),
    );

    let err = AssetCache::from_config(&config).unwrap_err();
    assert!(matches!(err, AssetError::UnknownSubject { ref raw } if raw == "Oilers"));
}
