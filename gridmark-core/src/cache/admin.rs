//! Cache administration: size accounting, listing, eviction and a
//! reachability check of the configured URL tables.
//!
//! These operations scan the directory tree on every call and are not
//! synchronized with in-flight downloads. A `clear` that races a download
//! may be followed by that download's file reappearing.

use std::{collections::BTreeMap, io::ErrorKind, path::PathBuf};

use chrono::{DateTime, Utc};
use futures::{StreamExt, stream};
use gridmark_model::{AssetKind, HeadshotSize, TeamKey};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    key::CacheKey,
    manager::AssetCache,
    store::{is_meta_file, is_temp_file, remove_if_exists, temp_target},
};
use crate::error::{AssetError, FetchFailure, Result};

/// Which part of the cache an eviction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    All,
    Kind(AssetKind),
}

impl ClearScope {
    fn kinds(self) -> Vec<AssetKind> {
        match self {
            ClearScope::All => AssetKind::ALL.to_vec(),
            ClearScope::Kind(kind) => vec![kind],
        }
    }
}

impl From<AssetKind> for ClearScope {
    fn from(kind: AssetKind) -> Self {
        ClearScope::Kind(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub root: PathBuf,
    pub counts_by_kind: BTreeMap<AssetKind, u64>,
    pub bytes_by_kind: BTreeMap<AssetKind, u64>,
    pub total_bytes: u64,
}

impl CacheStats {
    pub fn total_count(&self) -> u64 {
        self.counts_by_kind.values().sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub removed_files: u64,
    pub freed_bytes: u64,
}

/// One cached file, as found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub local_path: PathBuf,
    pub size_bytes: u64,
    /// From the sidecar, or the file's modification time when the sidecar
    /// is missing.
    pub fetched_at: Option<DateTime<Utc>>,
    pub source_url: Option<String>,
    pub substituted: Option<AssetKind>,
    /// Headshot size actually stored when the requested one was unavailable.
    pub served_size: Option<HeadshotSize>,
}

/// One configured team URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlTarget {
    pub team: TeamKey,
    pub kind: AssetKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreachableUrl {
    pub target: UrlTarget,
    pub failure: FetchFailure,
}

/// Outcome of [`AssetCache::check_urls`]. Both lists are sorted by kind,
/// then team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlCheckReport {
    pub reachable: Vec<UrlTarget>,
    pub unreachable: Vec<UnreachableUrl>,
}

impl UrlCheckReport {
    pub fn all_reachable(&self) -> bool {
        self.unreachable.is_empty()
    }
}

struct ScannedFile {
    key: CacheKey,
    path: PathBuf,
    size: u64,
    modified: Option<DateTime<Utc>>,
}

enum ScanItem {
    Asset(ScannedFile),
    /// Temp file plus the key it was being written for, when recognizable.
    Temp(PathBuf, Option<CacheKey>),
}

impl AssetCache {
    /// Counts and sizes per kind, freshly scanned.
    pub async fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats {
            root: self.root().to_path_buf(),
            counts_by_kind: BTreeMap::new(),
            bytes_by_kind: BTreeMap::new(),
            total_bytes: 0,
        };
        for kind in AssetKind::ALL {
            let mut count = 0u64;
            let mut bytes = 0u64;
            for item in self.scan(kind).await? {
                if let ScanItem::Asset(file) = item {
                    count += 1;
                    bytes += file.size;
                }
            }
            stats.counts_by_kind.insert(kind, count);
            stats.bytes_by_kind.insert(kind, bytes);
            stats.total_bytes += bytes;
        }
        Ok(stats)
    }

    /// Delete cached files (and their sidecars) in `scope`. Directories are
    /// kept.
    pub async fn clear(&self, scope: impl Into<ClearScope>) -> Result<ClearReport> {
        let scope = scope.into();
        let mut report = ClearReport::default();
        for kind in scope.kinds() {
            for item in self.scan(kind).await? {
                if let ScanItem::Asset(file) = item {
                    report.freed_bytes += self.inner.store.remove(&file.key).await?;
                    report.removed_files += 1;
                }
            }
        }
        info!(
            ?scope,
            removed = report.removed_files,
            freed_bytes = report.freed_bytes,
            "asset cache cleared"
        );
        Ok(report)
    }

    /// Every cached file of `kind`, sorted by key.
    pub async fn entries(&self, kind: AssetKind) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();
        for item in self.scan(kind).await? {
            let ScanItem::Asset(file) = item else {
                continue;
            };
            let meta = self.inner.store.read_meta(&file.key).await;
            entries.push(CacheEntry {
                fetched_at: meta.as_ref().map(|m| m.fetched_at).or(file.modified),
                source_url: meta.as_ref().map(|m| m.source_url.clone()),
                substituted: meta.as_ref().and_then(|m| m.substituted),
                served_size: meta.and_then(|m| m.served_size),
                key: file.key,
                local_path: file.path,
                size_bytes: file.size,
            });
        }
        entries.sort_by(|a, b| a.key.file_name().cmp(&b.key.file_name()));
        Ok(entries)
    }

    /// Remove temp files left behind by interrupted writes. Returns how
    /// many were deleted. Temp files of keys with a download in flight on
    /// this handle are left alone.
    pub async fn sweep_temp_files(&self) -> Result<u64> {
        let mut removed = 0;
        for kind in AssetKind::ALL {
            for item in self.scan(kind).await? {
                let ScanItem::Temp(path, key) = item else {
                    continue;
                };
                if key.as_ref().is_some_and(|key| self.is_fetching(key)) {
                    continue;
                }
                debug!(path = %path.display(), "removing orphaned temp file");
                remove_if_exists(&path).await?;
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, "swept orphaned cache temp files");
        }
        Ok(removed)
    }

    /// Request every configured logo and wordmark URL, at most
    /// `concurrency` at a time. Nothing is written to the cache.
    pub async fn check_urls(&self, concurrency: usize) -> UrlCheckReport {
        let table = self.urls().all_urls();
        let targets = table
            .logos
            .into_iter()
            .map(|(team, url)| (team, AssetKind::Logo, url))
            .chain(
                table
                    .wordmarks
                    .into_iter()
                    .map(|(team, url)| (team, AssetKind::Wordmark, url)),
            );

        let outcomes: Vec<_> = stream::iter(targets)
            .map(|(team, kind, url)| async move {
                let outcome = self.inner.fetch_once(&url, kind).await.map(|_| ());
                let target = UrlTarget {
                    team,
                    kind,
                    url: url.to_string(),
                };
                (target, outcome)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut report = UrlCheckReport::default();
        for (target, outcome) in outcomes {
            match outcome {
                Ok(()) => report.reachable.push(target),
                Err(failure) => {
                    warn!(team = %target.team, kind = %target.kind, "asset URL unreachable: {failure}");
                    report.unreachable.push(UnreachableUrl { target, failure });
                }
            }
        }
        report.reachable.sort_by_key(|t| (t.kind, t.team));
        report
            .unreachable
            .sort_by_key(|u| (u.target.kind, u.target.team));

        info!(
            reachable = report.reachable.len(),
            unreachable = report.unreachable.len(),
            "asset URL check finished"
        );
        report
    }

    async fn scan(&self, kind: AssetKind) -> Result<Vec<ScanItem>> {
        let dir = self.inner.store.dir_for(kind);
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(AssetError::Internal(format!(
                    "failed to list cache dir {:?}: {err}",
                    dir
                )));
            }
        };

        let mut items = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                // Removed between listing and stat.
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };
            if is_temp_file(name) {
                let key = temp_target(name)
                    .and_then(|target| CacheKey::from_file_name(kind, target));
                items.push(ScanItem::Temp(entry.path(), key));
                continue;
            }
            if is_meta_file(name) {
                continue;
            }
            let Some(key) = CacheKey::from_file_name(kind, name) else {
                continue;
            };
            items.push(ScanItem::Asset(ScannedFile {
                key,
                path: entry.path(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            }));
        }
        Ok(items)
    }
}
