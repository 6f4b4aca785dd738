//! Configuration type definitions

use alloc::string::String;

use serde::{Deserialize, Serialize};
use transit_hal::DEFAULT_CONNECT_TIMEOUT_MS;

use crate::extract::{Extractor, FeedExtractor, FeedKind};
use crate::fetch::{build_feed_url, RetryPolicy};
use crate::render::Layout;
use crate::scheduler::DEFAULT_PERIOD_MS;

use super::ConfigError;

/// Feed source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Host (and port), with or without scheme
    pub base_url: String,
    /// Path and query appended after the base
    pub path: String,
    /// Feed variant
    pub kind: FeedKind,
    /// Sent as the `x-apikey` header when set
    pub api_key: Option<String>,
    /// Override the variant's parse-failure retry behaviour
    pub retry_parse_failures: Option<bool>,
    /// TCP connect timeout per request
    pub connect_timeout_ms: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("localhost:8000"),
            path: String::new(),
            kind: FeedKind::Structured,
            api_key: None,
            retry_parse_failures: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

/// Refresh timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between refreshes
    pub period_s: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            period_s: DEFAULT_PERIOD_MS / 1000,
        }
    }
}

impl ScheduleConfig {
    /// Period in milliseconds
    pub fn period_ms(&self) -> u32 {
        self.period_s.saturating_mul(1000)
    }
}

/// Fallback section titles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlesConfig {
    pub buses: String,
    pub trains: String,
}

impl Default for TitlesConfig {
    fn default() -> Self {
        Self {
            buses: String::from("Buses"),
            trains: String::from("Trains"),
        }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub feed: FeedConfig,
    pub retry: RetryPolicy,
    pub schedule: ScheduleConfig,
    pub layout: Layout,
    pub titles: TitlesConfig,
}

impl BoardConfig {
    /// Full feed URL
    pub fn feed_url(&self) -> String {
        build_feed_url(&self.feed.base_url, &self.feed.path)
    }

    /// Whether parse failures consume fetch attempts
    pub fn retry_parse_failures(&self) -> bool {
        self.feed
            .retry_parse_failures
            .unwrap_or_else(|| FeedExtractor::from(self.feed.kind).retries_parse_failures())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue("feed.base_url"));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue("retry.max_attempts"));
        }
        if self.schedule.period_s == 0 {
            return Err(ConfigError::InvalidValue("schedule.period_s"));
        }
        if self.layout.line_height <= 0 || self.layout.padding_bottom < 0 {
            return Err(ConfigError::InvalidValue("layout"));
        }
        Ok(())
    }
}
