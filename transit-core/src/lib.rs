//! Board-agnostic core logic for the departures display
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Departure/section data model with a fixed row cap
//! - Fixed-width row formatting
//! - Feed extraction (JSON feed, scraped HTML table, rail board)
//! - Fetching with connectivity checks and linear backoff retries
//! - Section rendering onto a paged display surface
//! - The refresh orchestrator and its periodic scheduler
//! - Configuration type definitions and TOML parsing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod extract;
pub mod fetch;
pub mod format;
pub mod model;
pub mod orchestrator;
pub mod render;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod mocks;

pub use config::{parse_config, BoardConfig, ConfigError};
pub use extract::{ExtractError, Extractor, FeedExtractor, FeedKind, Titles};
pub use fetch::{build_feed_url, AttemptError, FetchError, Fetcher, RetryPolicy};
pub use format::{format_row, ColumnLayout, TRANSIT_COLUMNS};
pub use model::{Board, Departure, Section, MAX_ROWS_PER_SECTION};
pub use orchestrator::{Orchestrator, SkipReason, TickOutcome};
pub use render::{Layout, SectionRenderer};
pub use scheduler::Scheduler;
