//! On-disk asset cache.
//!
//! Layout under the cache root:
//!
//! ```text
//! <root>/logos/ARI.png
//! <root>/logos/ARI.png.meta.json
//! <root>/wordmarks/KC.png
//! <root>/headshots/3139477.png
//! <root>/headshots/3139477-small.png
//! ```

pub mod admin;
pub mod fetch;
pub mod key;
pub mod manager;
pub mod stats;
pub mod store;

pub use admin::{
    CacheEntry, CacheStats, ClearReport, ClearScope, UnreachableUrl,
    UrlCheckReport, UrlTarget,
};
pub use fetch::{AssetFetcher, HttpFetcher, build_client};
pub use key::CacheKey;
pub use manager::{AssetCache, AssetCacheBuilder};
pub use stats::{CacheCounters, CacheCountersSnapshot};
pub use store::{AssetStore, EntryMeta};
