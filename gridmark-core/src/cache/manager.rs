use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use bytes::Bytes;
use dashmap::{DashMap, mapref::entry::Entry};
use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use gridmark_config::{AssetConfig, HttpConfig};
use gridmark_model::{
    AssetKind, AssetRequest, AssetSubject, HeadshotSize, PlayerIdentity,
    PlayerQuery,
};
use tracing::{debug, info, warn};
use url::Url;

use super::{
    fetch::{AssetFetcher, HttpFetcher, build_client},
    key::CacheKey,
    stats::{CacheCounters, CacheCountersSnapshot},
    store::{AssetStore, EntryMeta, ReadOutcome},
};
use crate::{
    error::{AssetError, FetchFailure, Result},
    identity::{PlayerResolver, clean_vendor_id},
    teams,
    urls::{AssetUrls, Candidates, ResolvedSubject},
};

type SharedFetch = Shared<BoxFuture<'static, Result<Bytes>>>;

/// Disk-backed asset cache.
///
/// Resolves a request to a canonical key, serves the file under the cache
/// root when present, and otherwise downloads it from the candidate URLs.
/// Concurrent misses for one key share a single download. Cloning is cheap
/// and clones share all state; build one per process and hand it around.
#[derive(Clone)]
pub struct AssetCache {
    pub(super) inner: Arc<CacheInner>,
}

pub(super) struct CacheInner {
    pub(super) store: AssetStore,
    urls: AssetUrls,
    resolver: PlayerResolver,
    fetcher: Arc<dyn AssetFetcher>,
    http: HttpConfig,
    in_flight: DashMap<CacheKey, SharedFetch>,
    pub(super) counters: CacheCounters,
}

impl fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetCache")
            .field("root", &self.inner.store.root())
            .field("resolver", &self.inner.resolver)
            .field("fetcher", &self.inner.fetcher)
            .field("in_flight", &self.inner.in_flight.len())
            .field("counters", &self.inner.counters.snapshot())
            .finish()
    }
}

/// Assembles an [`AssetCache`] from its collaborators.
#[derive(Debug)]
pub struct AssetCacheBuilder {
    root: PathBuf,
    urls: AssetUrls,
    resolver: Option<PlayerResolver>,
    fetcher: Option<Arc<dyn AssetFetcher>>,
    http: HttpConfig,
}

impl AssetCacheBuilder {
    pub fn urls(mut self, urls: AssetUrls) -> Self {
        self.urls = urls;
        self
    }

    pub fn resolver(mut self, resolver: PlayerResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn AssetFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Missing pieces default to the built-in URL tables, a reqwest fetcher
    /// and a resolver over the default remote oracle.
    pub fn build(self) -> Result<AssetCache> {
        let client = build_client()?;
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::with_client(
                client.clone(),
                self.http.user_agent.clone(),
            )),
        };
        let resolver = match self.resolver {
            Some(resolver) => resolver,
            None => {
                let config = AssetConfig {
                    http: self.http.clone(),
                    ..AssetConfig::default()
                };
                PlayerResolver::from_config(&config, client)
            }
        };

        Ok(AssetCache {
            inner: Arc::new(CacheInner {
                store: AssetStore::new(self.root),
                urls: self.urls,
                resolver,
                fetcher,
                http: self.http,
                in_flight: DashMap::new(),
                counters: CacheCounters::default(),
            }),
        })
    }
}

impl AssetCache {
    pub fn builder(root: impl Into<PathBuf>) -> AssetCacheBuilder {
        AssetCacheBuilder {
            root: root.into(),
            urls: AssetUrls::builtin(),
            resolver: None,
            fetcher: None,
            http: HttpConfig::default(),
        }
    }

    /// Build everything from loaded configuration: URL overrides, headshot
    /// size, timeouts, user agent and oracle location.
    pub fn from_config(config: &AssetConfig) -> Result<Self> {
        let mut urls = AssetUrls::builtin()
            .with_default_headshot_size(config.headshots.default_size);
        urls.apply_overrides(&config.urls)?;

        let client = build_client()?;
        let fetcher = Arc::new(HttpFetcher::with_client(
            client.clone(),
            config.http.user_agent.clone(),
        ));
        let resolver = PlayerResolver::from_config(config, client);

        info!(root = %config.cache_root().display(), "asset cache configured");

        Self::builder(config.cache_root())
            .urls(urls)
            .resolver(resolver)
            .fetcher(fetcher)
            .http(config.http.clone())
            .build()
    }

    pub fn root(&self) -> &Path {
        self.inner.store.root()
    }

    pub fn urls(&self) -> &AssetUrls {
        &self.inner.urls
    }

    pub fn resolver(&self) -> &PlayerResolver {
        &self.inner.resolver
    }

    pub fn counters(&self) -> CacheCountersSnapshot {
        self.inner.counters.snapshot()
    }

    /// Bytes for `request`, from disk when present.
    pub async fn get(&self, request: &AssetRequest) -> Result<Bytes> {
        self.get_with(request, false).await
    }

    /// Like [`AssetCache::get`]; `force_refresh` skips the disk check and
    /// always downloads (joining a download already in flight).
    pub async fn get_with(
        &self,
        request: &AssetRequest,
        force_refresh: bool,
    ) -> Result<Bytes> {
        let (_, bytes) = self.load(request, force_refresh).await?;
        Ok(bytes)
    }

    /// Ensure `request` is cached and return its file path.
    pub async fn get_path(&self, request: &AssetRequest) -> Result<PathBuf> {
        let (key, _) = self.load(request, false).await?;
        Ok(self.inner.store.path_for(&key))
    }

    async fn load(
        &self,
        request: &AssetRequest,
        force_refresh: bool,
    ) -> Result<(CacheKey, Bytes)> {
        let subject = self.resolve_subject(&request.subject).await?;
        let size = request
            .variant
            .size
            .unwrap_or(self.inner.urls.default_headshot_size());
        let key = CacheKey::for_subject(&subject, request.kind, size, &request.variant)?;

        if !force_refresh {
            match self.inner.store.read(&key).await {
                ReadOutcome::Hit(bytes) => {
                    self.inner.counters.on_hit();
                    debug!(key = %key, "asset cache hit");
                    return Ok((key, bytes));
                }
                ReadOutcome::Missing => {}
                ReadOutcome::Corrupt { path, reason } => {
                    let bytes = self
                        .repair(&key, &subject, request.kind, size, path, reason)
                        .await?;
                    return Ok((key, bytes));
                }
            }
        }

        self.inner.counters.on_miss();
        let candidates = self.candidates(&subject, request.kind, size)?;
        let bytes = self.fetch_shared(key.clone(), candidates).await?;
        Ok((key, bytes))
    }

    pub async fn logo(&self, team: &str) -> Result<Bytes> {
        self.get(&AssetRequest::logo(team)).await
    }

    pub async fn wordmark(&self, team: &str) -> Result<Bytes> {
        self.get(&AssetRequest::wordmark(team)).await
    }

    pub async fn headshot(&self, query: PlayerQuery) -> Result<Bytes> {
        self.get(&AssetRequest::headshot(query)).await
    }

    pub(super) fn is_fetching(&self, key: &CacheKey) -> bool {
        self.inner.in_flight.contains_key(key)
    }

    async fn resolve_subject(&self, subject: &AssetSubject) -> Result<ResolvedSubject> {
        match subject {
            AssetSubject::Team(raw) => Ok(ResolvedSubject::Team(teams::normalize(raw)?)),
            // A vendor id is all a headshot URL needs.
            AssetSubject::Player(query) if query.vendor_id().is_some() => {
                let identity = PlayerIdentity::new(
                    query.league_id().map(str::to_string),
                    query.vendor_id().map(clean_vendor_id).transpose()?,
                    query.name().map(str::to_string),
                )?;
                Ok(ResolvedSubject::Player(identity))
            }
            AssetSubject::Player(query) => {
                let identity = self.inner.resolver.resolve(query).await?;
                Ok(ResolvedSubject::Player(identity))
            }
        }
    }

    fn candidates(
        &self,
        subject: &ResolvedSubject,
        kind: AssetKind,
        size: HeadshotSize,
    ) -> Result<Candidates> {
        let candidates = self.inner.urls.candidate_urls(subject, kind, Some(size))?;
        if candidates.is_empty() {
            return Err(AssetError::UnresolvedSubject {
                subject: format!("{subject:?}"),
                kind,
            });
        }
        Ok(candidates)
    }

    async fn repair(
        &self,
        key: &CacheKey,
        subject: &ResolvedSubject,
        kind: AssetKind,
        size: HeadshotSize,
        path: PathBuf,
        reason: String,
    ) -> Result<Bytes> {
        warn!(key = %key, path = %path.display(), "corrupt cache entry ({reason}); re-fetching");
        self.inner.counters.on_corruption_repair();

        let refetch = async {
            self.inner.store.remove(key).await?;
            let candidates = self.candidates(subject, kind, size)?;
            self.fetch_shared(key.clone(), candidates).await
        };
        refetch.await.map_err(|err| AssetError::CacheCorruption {
            path,
            refetch: Box::new(err),
        })
    }

    /// Join the in-flight download for `key`, or start one.
    ///
    /// The download runs as its own task, so it completes and populates the
    /// cache even if every caller stops waiting. The registry entry is
    /// removed by that task once the outcome is known.
    async fn fetch_shared(&self, key: CacheKey, candidates: Candidates) -> Result<Bytes> {
        let shared = match self.inner.in_flight.entry(key.clone()) {
            Entry::Occupied(existing) => {
                let waiters = self.inner.counters.on_waiter();
                debug!(key = %key, waiters, "singleflight wait");
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                let leaders = self.inner.counters.on_leader();
                debug!(key = %key, leaders, "singleflight lead");

                let inner = Arc::clone(&self.inner);
                let task_key = key.clone();
                let handle = tokio::spawn(async move {
                    let result = inner.download(&task_key, &candidates).await;
                    inner.in_flight.remove(&task_key);
                    debug!(key = %task_key, ok = result.is_ok(), "singleflight complete");
                    result
                });
                let fetch = async move {
                    handle.await.unwrap_or_else(|err| {
                        Err(AssetError::Internal(format!("fetch task failed: {err}")))
                    })
                }
                .boxed()
                .shared();
                slot.insert(fetch.clone());
                fetch
            }
        };
        shared.await
    }
}

impl CacheInner {
    /// One request bounded by the timeout for `kind`. An empty body counts
    /// as a failure.
    pub(super) async fn fetch_once(
        &self,
        url: &Url,
        kind: AssetKind,
    ) -> std::result::Result<Bytes, FetchFailure> {
        let timeout = self.http.timeout_for(kind);
        match tokio::time::timeout(timeout, self.fetcher.fetch(url, timeout)).await {
            Ok(Ok(bytes)) if !bytes.is_empty() => Ok(bytes),
            Ok(Ok(_)) => Err(FetchFailure::EmptyBody {
                url: url.to_string(),
            }),
            Ok(Err(failure)) => Err(failure),
            Err(_) => Err(FetchFailure::Timeout {
                url: url.to_string(),
                after: timeout,
            }),
        }
    }

    /// Try each candidate in order; the first non-empty success is written
    /// to disk and returned.
    async fn download(&self, key: &CacheKey, candidates: &Candidates) -> Result<Bytes> {
        let mut failures = Vec::with_capacity(candidates.urls.len());

        if let Some(substitute) = candidates.substituted {
            info!(key = %key, substitute = %substitute, "fetching substitute asset");
        }

        for candidate in &candidates.urls {
            let url = &candidate.url;
            self.counters.on_http_attempt();
            match self.fetch_once(url, key.kind()).await {
                Ok(bytes) => {
                    let meta = EntryMeta::new(url.as_str(), candidates.substituted)
                        .with_served_size(candidate.size_fallback);
                    if let Some(size) = candidate.size_fallback {
                        info!(key = %key, served = %size, "headshot served in other size");
                    }
                    self.store.write(key, &bytes, &meta).await?;
                    info!(key = %key, url = %url, bytes = bytes.len(), "asset cached");
                    return Ok(bytes);
                }
                Err(failure) => {
                    warn!(key = %key, "candidate failed: {failure}");
                    failures.push(failure);
                }
            }
        }

        self.counters.on_fetch_failure();
        Err(AssetError::Fetch {
            key: key.to_string(),
            failures,
        })
    }
}
