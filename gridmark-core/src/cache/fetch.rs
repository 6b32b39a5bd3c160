use std::{fmt, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::error::{AssetError, FetchFailure, Result};

/// Transport used to download asset bytes.
///
/// Implementations report every failure as a [`FetchFailure`] so the cache
/// can move on to the next candidate.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> std::result::Result<Bytes, FetchFailure>;
}

impl fmt::Debug for dyn AssetFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<dyn AssetFetcher>")
    }
}

/// reqwest-backed fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(build_client()?, user_agent))
    }

    pub fn with_client(client: reqwest::Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Shared client for asset and oracle downloads, with compression disabled.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .no_deflate()
        .no_zstd()
        .no_brotli()
        .no_gzip()
        .build()
        .map_err(|err| AssetError::Internal(format!("failed to create HTTP client: {err}")))
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> std::result::Result<Bytes, FetchFailure> {
        let transport = |err: reqwest::Error| {
            if err.is_timeout() {
                FetchFailure::Timeout {
                    url: url.to_string(),
                    after: timeout,
                }
            } else {
                FetchFailure::Transport {
                    url: url.to_string(),
                    message: err.to_string(),
                }
            }
        };

        debug!(url = %url, "fetching asset");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "image/*,*/*;q=0.8")
            .timeout(timeout)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let expected_len = response.content_length();
        let bytes = response.bytes().await.map_err(transport)?;

        if let Some(content_len) = expected_len
            && bytes.len() as u64 != content_len
        {
            return Err(FetchFailure::Transport {
                url: url.to_string(),
                message: format!(
                    "size mismatch: got {} bytes, expected {content_len}",
                    bytes.len()
                ),
            });
        }
        if bytes.is_empty() {
            return Err(FetchFailure::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(bytes)
    }
}
