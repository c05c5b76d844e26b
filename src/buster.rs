//! This module contains the core logic for probing a single candidate URL.
//! It defines the HTTP transport seam, the classification of each attempt,
//! the retry loop with its notice deduplication, and the shared progress counter.

use crate::error::{FailureKind, FetchError};
use crate::output::{Reporter, format_report_line, format_retry_notice};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, LOCATION};
use reqwest::{Client, StatusCode, Url};
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

const USER_AGENT: &str = concat!("httpbrute/", env!("CARGO_PKG_VERSION"));

/// Settings shared by every probe in a run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Constant wait between attempts after a transport failure.
    pub retry_wait: Duration,
    pub log_retries: bool,
}

/// Where a `Location` header pointed, resolved against the final request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Resolved(String),
    /// The header was present but could not be resolved.
    Invalid(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Resolved(url) => f.write_str(url),
            Location::Invalid(err) => write!(f, "Error: {err}"),
        }
    }
}

/// What the transport saw for one completed round trip.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: StatusCode,
    /// URL of the last request made, after any redirects were followed.
    pub final_url: String,
    pub location: Option<Location>,
}

/// Issues a single GET. Implemented over reqwest for real runs.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Per-request limit. `None` leaves the transport defaults alone.
    pub request_timeout: Option<Duration>,
    pub parallel: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_timeout: None,
            parallel: 4,
        }
    }
}

pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(settings.parallel.max(1));
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        let requested = Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self
            .client
            .get(requested.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // Only report a different URL when a redirect actually happened, not
        // when parsing merely normalized the candidate.
        let final_url = if response.url() == &requested {
            url.to_string()
        } else {
            response.url().to_string()
        };
        Ok(FetchedResponse {
            status: response.status(),
            location: resolve_location(response.url(), response.headers().get(LOCATION)),
            final_url,
        })
    }
}

/// Resolves a `Location` header value relative to `base`.
///
/// Returns `None` only when there is no header.
pub fn resolve_location(base: &Url, header: Option<&HeaderValue>) -> Option<Location> {
    let value = header?;
    let location = match value.to_str() {
        Ok(raw) => match base.join(raw) {
            Ok(url) => Location::Resolved(url.to_string()),
            Err(err) => Location::Invalid(err.to_string()),
        },
        Err(err) => Location::Invalid(err.to_string()),
    };
    Some(location)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let message = error_chain(&err);
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_connect() {
        FailureKind::Connect
    } else if err.is_builder() {
        FailureKind::InvalidUrl
    } else if message.contains("connection closed before message completed") {
        FailureKind::EmptyReply
    } else {
        FailureKind::Transport
    };
    FetchError::new(kind, message)
}

/// reqwest's own message hides the underlying cause, so walk the sources.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Classification of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// No response was received; the attempt will be repeated.
    TransientFailure(String),
    NotFound,
    /// A response arrived from a different URL than the one requested.
    Redirected {
        status: StatusCode,
        final_url: String,
        location: Option<Location>,
    },
    Reported {
        status: StatusCode,
        location: Option<Location>,
    },
}

/// Decides what a fetch result means for `url`.
pub fn classify(url: &str, attempt: Result<FetchedResponse, FetchError>) -> ProbeOutcome {
    match attempt {
        Err(err) => ProbeOutcome::TransientFailure(err.message),
        Ok(response) if response.status == StatusCode::NOT_FOUND => ProbeOutcome::NotFound,
        Ok(response) if response.final_url != url => ProbeOutcome::Redirected {
            status: response.status,
            final_url: response.final_url,
            location: response.location,
        },
        Ok(response) => ProbeOutcome::Reported {
            status: response.status,
            location: response.location,
        },
    }
}

/// Remembers the last retry notice shown for one URL.
#[derive(Debug, Default)]
pub struct RetryMemo {
    last: Option<String>,
}

impl RetryMemo {
    /// Returns true and remembers `notice` if it differs from the previous one.
    pub fn is_new(&mut self, notice: &str) -> bool {
        if self.last.as_deref() == Some(notice) {
            return false;
        }
        self.last = Some(notice.to_string());
        true
    }
}

/// How a call to [`probe_url`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeEnd {
    /// A non-404 response was reported.
    Found,
    NotFound,
    /// Shutdown was requested before a response arrived.
    Cancelled,
}

impl ProbeEnd {
    /// Found and NotFound both count as a tried URL.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProbeEnd::Cancelled)
    }
}

/// Probes `url` until it yields a response or `shutdown` fires.
///
/// Transport failures are retried forever with a constant wait. Identical
/// consecutive retry notices for this URL are shown only once.
pub async fn probe_url(
    url: &str,
    fetcher: &dyn Fetcher,
    config: &ProbeConfig,
    reporter: &dyn Reporter,
    shutdown: &CancellationToken,
) -> ProbeEnd {
    let mut memo = RetryMemo::default();
    loop {
        let attempt = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return ProbeEnd::Cancelled,
            attempt = fetcher.fetch(url) => attempt,
        };

        if let Err(err) = &attempt {
            log::debug!("{url}: {:?} failure: {}", err.kind, err.message);
        }

        match classify(url, attempt) {
            ProbeOutcome::TransientFailure(cause) => {
                if config.log_retries {
                    let notice = format_retry_notice(url, config.retry_wait, &cause);
                    if memo.is_new(&notice) {
                        reporter.retry(&notice);
                    }
                }
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => return ProbeEnd::Cancelled,
                    _ = sleep(config.retry_wait) => {}
                }
            }
            ProbeOutcome::NotFound => return ProbeEnd::NotFound,
            ProbeOutcome::Redirected {
                status,
                final_url,
                location,
            } => {
                let line = format_report_line(url, status, Some(&final_url), location.as_ref());
                reporter.found(status, &line);
                return ProbeEnd::Found;
            }
            ProbeOutcome::Reported { status, location } => {
                reporter.found(status, &format_report_line(url, status, None, location.as_ref()));
                return ProbeEnd::Found;
            }
        }
    }
}

/// Number of URLs that reached a terminal outcome.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    tried: AtomicUsize,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more tried URL and returns the new total.
    pub fn record(&self) -> usize {
        self.tried.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total(&self) -> usize {
        self.tried.load(Ordering::Relaxed)
    }
}
