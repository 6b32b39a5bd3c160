use std::{fmt, path::PathBuf, sync::Arc, time::Duration};

use gridmark_model::{AssetKind, ModelError};
use thiserror::Error;

/// Why a player query did not produce an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionReason {
    /// The oracle has no row matching the query.
    NotFound,
    /// The oracle could not be loaded; the attempt is not memoized.
    OracleUnavailable(String),
}

/// Expected, non-fatal outcome of player resolution. Callers usually fall
/// back to a text label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not resolve player {query}: {reason}")]
pub struct ResolutionFailure {
    pub query: String,
    pub reason: ResolutionReason,
}

impl ResolutionFailure {
    pub fn not_found(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            reason: ResolutionReason::NotFound,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.reason == ResolutionReason::NotFound
    }
}

impl fmt::Display for ResolutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionReason::NotFound => f.write_str("not found"),
            ResolutionReason::OracleUnavailable(msg) => {
                write!(f, "oracle unavailable ({msg})")
            }
        }
    }
}

/// One failed candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Transport { url: String, message: String },
    Status { url: String, status: u16 },
    EmptyBody { url: String },
    Timeout { url: String, after: Duration },
}

impl FetchFailure {
    pub fn url(&self) -> &str {
        match self {
            FetchFailure::Transport { url, .. }
            | FetchFailure::Status { url, .. }
            | FetchFailure::EmptyBody { url }
            | FetchFailure::Timeout { url, .. } => url,
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Transport { url, message } => {
                write!(f, "{url}: {message}")
            }
            FetchFailure::Status { url, status } => {
                write!(f, "{url}: HTTP {status}")
            }
            FetchFailure::EmptyBody { url } => write!(f, "{url}: empty body"),
            FetchFailure::Timeout { url, after } => {
                write!(f, "{url}: timed out after {}ms", after.as_millis())
            }
        }
    }
}

struct FailureList<'a>(&'a [FetchFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, failure) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

/// Errors surfaced by the asset cache and its resolvers.
///
/// Cloneable so that every waiter on a shared fetch receives the same value.
#[derive(Error, Debug, Clone)]
pub enum AssetError {
    #[error("unknown team: {raw}")]
    UnknownSubject { raw: String },

    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),

    #[error("no candidate URL for {kind} of {subject}")]
    UnresolvedSubject { subject: String, kind: AssetKind },

    #[error("invalid vendor id '{raw}'")]
    InvalidVendorId { raw: String },

    #[error("player {player} has no vendor id")]
    MissingVendorId { player: String },

    #[error("all candidates failed for {key}: {}", FailureList(.failures))]
    Fetch {
        key: String,
        failures: Vec<FetchFailure>,
    },

    #[error("cache file {path:?} was corrupt and re-fetch failed: {refetch}")]
    CacheCorruption {
        path: PathBuf,
        refetch: Box<AssetError>,
    },

    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("oracle error: {0}")]
    Oracle(String),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssetError {
    /// True for network-layer failures that may succeed on a later call.
    pub fn is_retryable(&self) -> bool {
        match self {
            AssetError::Fetch { .. } | AssetError::Io(_) => true,
            AssetError::CacheCorruption { refetch, .. } => {
                refetch.is_retryable()
            }
            AssetError::Resolution(failure) => matches!(
                failure.reason,
                ResolutionReason::OracleUnavailable(_)
            ),
            AssetError::Oracle(_) => true,
            _ => false,
        }
    }
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::Io(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;
