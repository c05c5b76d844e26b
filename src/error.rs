//! Error types for the scanner.

use std::io;
use thiserror::Error;

/// Problems that stop the run before any probing starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please specify a target with --target")]
    MissingTarget,
    #[error("Please specify a wordlist with --wordlist")]
    MissingWordlist,
    #[error("Error opening wordlist file {path}: {source}")]
    OpenWordlist {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Error building HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Broad category of a failed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    /// The server closed the connection without sending a response.
    EmptyReply,
    InvalidUrl,
    Transport,
}

/// A request that never produced an HTTP response.
///
/// Every kind is treated as transient by the prober.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
