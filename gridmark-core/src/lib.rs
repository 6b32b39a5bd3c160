//! # Gridmark Core
//!
//! Resolves NFL team and player identifiers to branding assets and keeps a
//! local disk cache of the downloaded images.
//!
//! ## Overview
//!
//! - [`teams`]: normalizes free-form team references (`"ARZ"`, `"Cardinals"`,
//!   `"Arizona Cardinals"`) to a canonical [`TeamKey`]
//! - [`identity`]: cross-references partial player identities against a CSV
//!   player oracle
//! - [`urls`]: maps a resolved subject and asset kind to candidate source URLs
//! - [`cache`]: the disk cache, with single-flight downloads, atomic writes
//!   and administration (stats, listing, clearing)
//!
//! ## Example
//!
//! ```no_run
//! use gridmark_config::ConfigLoader;
//! use gridmark_core::AssetCache;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let loaded = ConfigLoader::new().load()?;
//! let cache = AssetCache::from_config(&loaded.config)?;
//!
//! let logo = cache.logo("ARZ").await?;
//! println!("{} bytes cached under {}", logo.len(), cache.root().display());
//! # Ok(())
//! # }
//! ```
#![allow(missing_docs)]

pub mod cache;
pub mod error;
pub mod identity;
pub mod teams;
pub mod urls;

pub use cache::{
    AssetCache, AssetCacheBuilder, AssetFetcher, CacheEntry, CacheKey,
    CacheStats, ClearReport, ClearScope, HttpFetcher, UrlCheckReport,
};
pub use error::{
    AssetError, FetchFailure, ResolutionFailure, ResolutionReason, Result,
};
pub use identity::{Oracle, OracleSource, PlayerResolver};
pub use teams::{normalize, validate_teams};
pub use urls::{AssetUrls, CandidateUrl, Candidates, ResolvedSubject};

pub use gridmark_model::{
    AssetKind, AssetRequest, AssetSubject, AssetVariant, HeadshotSize,
    PlayerIdentity, PlayerQuery, TeamKey,
};
