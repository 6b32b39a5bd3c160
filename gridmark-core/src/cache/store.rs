use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use gridmark_model::{AssetKind, HeadshotSize};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use super::key::CacheKey;
use crate::error::{AssetError, Result};

const TEMP_MARKER: &str = ".tmp-";
const META_SUFFIX: &str = ".meta.json";

pub(crate) fn is_temp_file(name: &str) -> bool {
    name.contains(TEMP_MARKER)
}

/// File name a temp file was going to be renamed to.
pub(crate) fn temp_target(name: &str) -> Option<&str> {
    name.split_once(TEMP_MARKER).map(|(target, _)| target)
}

pub(crate) fn is_meta_file(name: &str) -> bool {
    name.ends_with(META_SUFFIX)
}

/// Sidecar written next to each cached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    pub source_url: String,
    pub fetched_at: DateTime<Utc>,
    /// Kind actually fetched when it differs from the file's directory,
    /// e.g. a logo stored as a wordmark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substituted: Option<AssetKind>,
    /// Headshot size actually fetched when the requested one was
    /// unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub served_size: Option<HeadshotSize>,
}

impl EntryMeta {
    pub fn new(source_url: impl Into<String>, substituted: Option<AssetKind>) -> Self {
        Self {
            source_url: source_url.into(),
            fetched_at: Utc::now(),
            substituted,
            served_size: None,
        }
    }

    pub fn with_served_size(mut self, size: Option<HeadshotSize>) -> Self {
        self.served_size = size;
        self
    }
}

/// What a lookup found on disk.
#[derive(Debug)]
pub(crate) enum ReadOutcome {
    Hit(Bytes),
    Missing,
    /// File exists but is empty or could not be read.
    Corrupt { path: PathBuf, reason: String },
}

/// File-backed asset blobs laid out as `<root>/<kind dir>/<key file>`.
///
/// Writes go to a uniquely named temp file in the destination directory and
/// are renamed into place, so readers only ever see complete files.
#[derive(Clone, Debug)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir_for(&self, kind: AssetKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir_for(key.kind()).join(key.file_name())
    }

    pub fn meta_path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir_for(key.kind())
            .join(format!("{}{META_SUFFIX}", key.file_name()))
    }

    pub async fn ensure_dir(&self, kind: AssetKind) -> Result<PathBuf> {
        let dir = self.dir_for(kind);
        tokio::fs::create_dir_all(&dir).await.map_err(|err| {
            AssetError::Internal(format!(
                "failed to create cache dir {:?}: {err}",
                dir
            ))
        })?;
        Ok(dir)
    }

    pub(crate) async fn read(&self, key: &CacheKey) -> ReadOutcome {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => ReadOutcome::Corrupt {
                path,
                reason: "zero-length file".to_string(),
            },
            Ok(bytes) => ReadOutcome::Hit(Bytes::from(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => ReadOutcome::Missing,
            Err(err) => ReadOutcome::Corrupt {
                path,
                reason: err.to_string(),
            },
        }
    }

    /// Atomically replace the file for `key`, then record its sidecar.
    pub async fn write(
        &self,
        key: &CacheKey,
        bytes: &[u8],
        meta: &EntryMeta,
    ) -> Result<PathBuf> {
        self.ensure_dir(key.kind()).await?;
        let path = self.path_for(key);
        write_atomic(&path, bytes).await?;

        // The sidecar is informational; a missing one only loses the source
        // URL in listings.
        match serde_json::to_vec_pretty(meta) {
            Ok(json) => {
                if let Err(err) = write_atomic(&self.meta_path_for(key), &json).await {
                    warn!(key = %key, "failed to write cache sidecar: {err}");
                }
            }
            Err(err) => warn!(key = %key, "failed to encode cache sidecar: {err}"),
        }

        debug!(key = %key, bytes = bytes.len(), "cache entry written");
        Ok(path)
    }

    pub async fn read_meta(&self, key: &CacheKey) -> Option<EntryMeta> {
        let raw = tokio::fs::read(self.meta_path_for(key)).await.ok()?;
        match serde_json::from_slice(&raw) {
            Ok(meta) => Some(meta),
            Err(err) => {
                debug!(key = %key, "ignoring unreadable cache sidecar: {err}");
                None
            }
        }
    }

    /// Remove the file and its sidecar. Returns the bytes freed; a missing
    /// file is not an error.
    pub async fn remove(&self, key: &CacheKey) -> Result<u64> {
        let path = self.path_for(key);
        let size = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(err) if err.kind() == ErrorKind::NotFound => 0,
            Err(err) => return Err(err.into()),
        };
        remove_if_exists(&path).await?;
        remove_if_exists(&self.meta_path_for(key)).await?;
        Ok(size)
    }
}

pub(crate) async fn remove_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(AssetError::Internal(format!(
            "failed to remove {:?}: {err}",
            path
        ))),
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            AssetError::Internal(format!("cache path {:?} has no file name", path))
        })?;
    let tmp = path.with_file_name(format!(
        "{file_name}{TEMP_MARKER}{}",
        Uuid::new_v4().simple()
    ));

    let result = async {
        let mut file = tokio::fs::File::create(&tmp).await.map_err(|err| {
            AssetError::Internal(format!(
                "failed to create temp cache file {:?}: {err}",
                tmp
            ))
        })?;
        file.write_all(bytes).await.map_err(|err| {
            AssetError::Internal(format!(
                "failed to write temp cache file {:?}: {err}",
                tmp
            ))
        })?;
        file.flush().await.map_err(|err| {
            AssetError::Internal(format!(
                "failed to flush temp cache file {:?}: {err}",
                tmp
            ))
        })?;
        file.sync_all().await.map_err(|err| {
            AssetError::Internal(format!(
                "failed to sync temp cache file {:?}: {err}",
                tmp
            ))
        })?;
        drop(file);

        tokio::fs::rename(&tmp, path).await.map_err(|err| {
            AssetError::Internal(format!(
                "failed to move cache file {:?} -> {:?}: {err}",
                tmp, path
            ))
        })
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmark_model::{AssetVariant, TeamKey};
    use tempfile::TempDir;

    fn logo_key() -> CacheKey {
        CacheKey::for_team(TeamKey::Buf, AssetKind::Logo, &AssetVariant::default())
    }

    #[tokio::test]
    async fn write_then_read_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());
        let key = logo_key();

        let path = store
            .write(&key, b"png-bytes", &EntryMeta::new("https://x.test/buf.png", None))
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("logos").join("BUF.png"));

        match store.read(&key).await {
            ReadOutcome::Hit(bytes) => assert_eq!(&bytes[..], b"png-bytes"),
            other => panic!("expected hit, got {other:?}"),
        }

        let names: Vec<String> = std::fs::read_dir(dir.path().join("logos"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().all(|n| !is_temp_file(n)), "{names:?}");

        let meta = store.read_meta(&key).await.unwrap();
        assert_eq!(meta.source_url, "https://x.test/buf.png");
    }

    #[tokio::test]
    async fn empty_file_reads_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());
        let key = logo_key();
        store.ensure_dir(AssetKind::Logo).await.unwrap();
        std::fs::write(store.path_for(&key), b"").unwrap();

        assert!(matches!(store.read(&key).await, ReadOutcome::Corrupt { .. }));
        assert!(matches!(
            store.read(&CacheKey::for_team(TeamKey::Kc, AssetKind::Logo, &AssetVariant::default())).await,
            ReadOutcome::Missing
        ));
    }

    #[tokio::test]
    async fn remove_reports_freed_bytes() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());
        let key = logo_key();
        store
            .write(&key, b"12345", &EntryMeta::new("https://x.test/buf.png", None))
            .await
            .unwrap();

        assert_eq!(store.remove(&key).await.unwrap(), 5);
        assert!(!store.path_for(&key).exists());
        assert!(!store.meta_path_for(&key).exists());
        assert_eq!(store.remove(&key).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sidecar_keeps_served_size() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().to_path_buf());
        let key = CacheKey::for_player("3139477", HeadshotSize::Full, &AssetVariant::default())
            .unwrap();
        let meta = EntryMeta::new("https://x.test/small/3139477.png", None)
            .with_served_size(Some(HeadshotSize::Small));
        store.write(&key, b"face", &meta).await.unwrap();

        let read = store.read_meta(&key).await.unwrap();
        assert_eq!(read.served_size, Some(HeadshotSize::Small));

        // Sidecars written before the field existed still parse.
        let legacy: EntryMeta = serde_json::from_str(
            r#"{"source_url":"https://x.test/a.png","fetched_at":"2024-09-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(legacy.served_size, None);
    }
}
