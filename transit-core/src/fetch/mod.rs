//! Feed fetching with bounded retries
//!
//! One fetch is a sequence of attempts. Each attempt brings the link up,
//! issues the GET and optionally validates the body; any failure sleeps a
//! linearly growing backoff before the next attempt. The sleep also follows
//! the last failed attempt, so consecutive fetches never hammer the server.

mod url;

use alloc::vec::Vec;
use core::fmt;

use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};
use transit_hal::{HttpClient, NetworkLink, Request};

use crate::extract::ExtractError;

pub use url::build_feed_url;

/// Retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts per fetch (at least one is always made)
    pub max_attempts: u8,
    /// Backoff unit; attempt `i` (0-indexed) waits `base * (i + 1)`
    pub base_backoff_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// Sleep after failed attempt `attempt` (0-indexed)
    pub fn backoff_ms(&self, attempt: u8) -> u32 {
        self.base_backoff_ms.saturating_mul(u32::from(attempt) + 1)
    }

    /// Effective attempt count
    pub fn attempts(&self) -> u8 {
        self.max_attempts.max(1)
    }
}

/// Why a single attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttemptError {
    /// Link could not be brought up
    Connectivity,
    /// Request could not be sent or response not received
    Transport,
    /// Server answered with something other than 200
    Status(u16),
    /// Body was received but rejected by validation
    FeedParse(ExtractError),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connectivity => write!(f, "network link unavailable"),
            Self::Transport => write!(f, "transport failure"),
            Self::Status(code) => write!(f, "HTTP status {}", code),
            Self::FeedParse(e) => write!(f, "feed rejected: {}", e),
        }
    }
}

/// Aggregate fetch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetchError {
    /// Every attempt failed
    Exhausted {
        /// Attempts made
        attempts: u8,
        /// Failure of the final attempt
        last: AttemptError,
    },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { attempts, last } => {
                write!(f, "fetch failed after {} attempts: {}", attempts, last)
            }
        }
    }
}

/// Fetcher over a network link and an HTTP client
pub struct Fetcher<L, C> {
    link: L,
    client: C,
    policy: RetryPolicy,
}

impl<L: NetworkLink, C: HttpClient> Fetcher<L, C> {
    /// Create a fetcher
    pub fn new(link: L, client: C, policy: RetryPolicy) -> Self {
        Self {
            link,
            client,
            policy,
        }
    }

    /// Retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Network link
    pub fn link(&self) -> &L {
        &self.link
    }

    /// HTTP client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch a body without validation
    pub fn fetch<D: DelayNs>(
        &mut self,
        request: &Request<'_>,
        delay: &mut D,
    ) -> Result<Vec<u8>, FetchError> {
        self.fetch_with(request, delay, Ok)
    }

    /// Fetch a body and hand it to `accept`
    ///
    /// A rejection by `accept` counts as a failed attempt.
    pub fn fetch_with<D, T, F>(
        &mut self,
        request: &Request<'_>,
        delay: &mut D,
        mut accept: F,
    ) -> Result<T, FetchError>
    where
        D: DelayNs,
        F: FnMut(Vec<u8>) -> Result<T, ExtractError>,
    {
        let attempts = self.policy.attempts();
        let mut last = AttemptError::Connectivity;

        for attempt in 0..attempts {
            match self.attempt(request, &mut accept) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Fetch attempt {}/{} failed: {}", attempt + 1, attempts, e);
                    last = e;
                }
            }
            delay.delay_ms(self.policy.backoff_ms(attempt));
        }

        #[cfg(feature = "defmt")]
        defmt::error!("Fetch gave up after {} attempts", attempts);

        Err(FetchError::Exhausted { attempts, last })
    }

    fn attempt<T, F>(&mut self, request: &Request<'_>, accept: &mut F) -> Result<T, AttemptError>
    where
        F: FnMut(Vec<u8>) -> Result<T, ExtractError>,
    {
        self.link
            .ensure_connected()
            .map_err(|_| AttemptError::Connectivity)?;

        let response = self
            .client
            .get(request)
            .map_err(|_| AttemptError::Transport)?;

        if !response.is_ok() {
            return Err(AttemptError::Status(response.status));
        }

        accept(response.body).map_err(AttemptError::FeedParse)
    }
}
