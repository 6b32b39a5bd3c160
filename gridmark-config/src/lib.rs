//! Configuration loading for gridmark.
//!
//! Values come from a `gridmark.toml` file and `GRIDMARK_*` environment
//! variables (optionally seeded from a `.env` file). Environment wins over the
//! file, the file wins over built-in defaults.
#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod sources;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
    ConfigWarning, ConfigWarnings, load_from_path,
};
pub use models::{
    AssetConfig, CacheConfig, ConfigMetadata, DEFAULT_ORACLE_URL,
    HeadshotConfig, HttpConfig, OracleConfig, UrlOverrides,
};
pub use sources::{EnvConfig, FileConfig};
