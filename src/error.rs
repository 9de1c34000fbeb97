// src/error.rs
use std::path::PathBuf;

/// The only hard failure of the extractor: markup too broken to walk.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("malformed HTML at byte {offset}: {reason}")]
    MalformedInput { offset: usize, reason: &'static str },
}

impl ExtractError {
    pub(crate) fn malformed(offset: usize, reason: &'static str) -> Self {
        Self::MalformedInput { offset, reason }
    }
}

/// Failure to obtain the results page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to deliver one notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook returned HTTP {status}")]
    Rejected { status: u16 },
}

/// A poll that produced no records.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Options that parse but cannot drive a watcher.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no target CRNs configured (set --targets or TARGET_CRNS)")]
    NoTargets,

    #[error("poll interval must be non-zero unless --once is given")]
    ZeroInterval,
}
