//! Shared fixtures for cache integration tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, Once,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use gridmark_config::HttpConfig;
use gridmark_core::{
    AssetCache, AssetFetcher, AssetUrls, FetchFailure, Oracle, PlayerResolver,
    identity::StaticOracle,
};
use tempfile::TempDir;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use url::Url;

pub const ORACLE_CSV: &str = "\
gsis_id,espn_id,name,team,position
00-0033873,3139477,Patrick Mahomes,KC,QB
00-0034857,3918298,Josh Allen,BUF,QB
00-0036389,4241479,Tua Tagovailoa,MIA,QB
00-0020000,,Old Timer,OAK,K
";

pub const ARI_LOGO: &str = "https://assets.test/logos/ari.png";
pub const KC_LOGO: &str = "https://assets.test/logos/kc.png";
pub const KC_WORDMARK: &str = "https://assets.test/wordmarks/kc.png";
pub const BUF_LOGO: &str = "https://assets.test/logos/buf.png";

static TRACING: Once = Once::new();

/// Route test logs through `RUST_LOG` when set.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(fmt::layer().with_test_writer())
            .try_init();
    });
}

#[derive(Clone, Debug)]
pub enum Reply {
    Body(Bytes),
    Status(u16),
    /// Never answers within any sane timeout.
    Hang,
}

/// In-memory fetcher that counts every request per URL.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl FakeFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, url: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(url.to_string(), reply);
    }

    pub fn body(&self, url: &str, body: &'static [u8]) {
        self.reply(url, Reply::Body(Bytes::from_static(body)));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl AssetFetcher for FakeFetcher {
    async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<Bytes, FetchFailure> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default() += 1;

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().unwrap().get(url.as_str()).cloned();
        match reply {
            Some(Reply::Body(bytes)) => Ok(bytes),
            Some(Reply::Status(status)) => Err(FetchFailure::Status {
                url: url.to_string(),
                status,
            }),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(FetchFailure::Transport {
                    url: url.to_string(),
                    message: "hung".to_string(),
                })
            }
            None => Err(FetchFailure::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// URL tables pointing at the fake host. KC has a wordmark; ARI and BUF
/// only have logos.
pub fn test_urls() -> AssetUrls {
    let mut urls = AssetUrls::empty();
    urls.set_logo_url("ARI", ARI_LOGO).unwrap();
    urls.set_logo_url("KC", KC_LOGO).unwrap();
    urls.set_logo_url("BUF", BUF_LOGO).unwrap();
    urls.set_wordmark_url("KC", KC_WORDMARK).unwrap();
    urls
}

pub fn test_resolver() -> PlayerResolver {
    let oracle = Oracle::from_csv_bytes(ORACLE_CSV.as_bytes()).unwrap();
    PlayerResolver::new(Arc::new(StaticOracle::new(oracle)))
}

#[derive(Debug)]
pub struct Harness {
    pub dir: TempDir,
    pub fetcher: Arc<FakeFetcher>,
    pub cache: AssetCache,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_http(HttpConfig::default())
    }

    pub fn with_http(http: HttpConfig) -> Self {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let fetcher = FakeFetcher::new();
        let cache = Self::cache_at(&dir, fetcher.clone(), http);
        Self {
            dir,
            fetcher,
            cache,
        }
    }

    /// A second handle over the same directory and fetcher, with its own
    /// in-flight registry.
    pub fn reopen(&self) -> AssetCache {
        Self::cache_at(&self.dir, self.fetcher.clone(), HttpConfig::default())
    }

    fn cache_at(dir: &TempDir, fetcher: Arc<FakeFetcher>, http: HttpConfig) -> AssetCache {
        AssetCache::builder(dir.path())
            .urls(test_urls())
            .resolver(test_resolver())
            .fetcher(fetcher)
            .http(http)
            .build()
            .unwrap()
    }
}
