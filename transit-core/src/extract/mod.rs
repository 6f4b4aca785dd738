//! Feed extraction
//!
//! Turns a raw response body into a [`Board`]. The feed variant is chosen
//! once from configuration; each refresh runs the same extractor.
//!
//! - [`StructuredExtractor`] - JSON document with `bus_info` and `train_info`
//! - [`ScrapedExtractor`] - HTML page containing a real-time table
//! - [`RailBoardExtractor`] - raw rail departure board JSON

pub mod rail;
pub mod scrape;
pub mod structured;

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Board;

pub use rail::RailBoardExtractor;
pub use scrape::ScrapedExtractor;
pub use structured::{StructuredExtractor, JSON_DOC_CAPACITY};

/// Extraction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExtractError {
    /// Body exceeds the document capacity
    DocumentTooLarge,
    /// Body is not a well-formed document of the expected shape
    Malformed,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentTooLarge => write!(f, "feed document too large"),
            Self::Malformed => write!(f, "malformed feed document"),
        }
    }
}

/// Fallback section titles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Titles<'a> {
    /// Used when the feed gives no bus title
    pub buses: &'a str,
    /// Used when the feed gives no train title
    pub trains: &'a str,
}

impl Default for Titles<'_> {
    fn default() -> Self {
        Self {
            buses: "Buses",
            trains: "Trains",
        }
    }
}

/// Body to board conversion
pub trait Extractor {
    /// Extract a board from a complete response body
    fn extract(&self, body: &[u8], titles: &Titles<'_>) -> Result<Board, ExtractError>;

    /// Whether an extraction failure should consume a fetch attempt
    ///
    /// When true the fetcher treats a parse failure like a bad response
    /// and retries; when false the body is handed over as-is.
    fn retries_parse_failures(&self) -> bool {
        true
    }
}

/// Feed variant selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// Pre-processed JSON feed
    #[default]
    Structured,
    /// HTML page with a real-time table
    Scraped,
    /// Rail departure board JSON
    RailBoard,
}

/// Extractor chosen from a [`FeedKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedExtractor {
    Structured(StructuredExtractor),
    Scraped(ScrapedExtractor),
    RailBoard(RailBoardExtractor),
}

impl From<FeedKind> for FeedExtractor {
    fn from(kind: FeedKind) -> Self {
        match kind {
            FeedKind::Structured => Self::Structured(StructuredExtractor),
            FeedKind::Scraped => Self::Scraped(ScrapedExtractor),
            FeedKind::RailBoard => Self::RailBoard(RailBoardExtractor),
        }
    }
}

impl FeedExtractor {
    /// Variant this extractor handles
    pub fn kind(&self) -> FeedKind {
        match self {
            Self::Structured(_) => FeedKind::Structured,
            Self::Scraped(_) => FeedKind::Scraped,
            Self::RailBoard(_) => FeedKind::RailBoard,
        }
    }
}

impl Extractor for FeedExtractor {
    fn extract(&self, body: &[u8], titles: &Titles<'_>) -> Result<Board, ExtractError> {
        match self {
            Self::Structured(e) => e.extract(body, titles),
            Self::Scraped(e) => e.extract(body, titles),
            Self::RailBoard(e) => e.extract(body, titles),
        }
    }

    fn retries_parse_failures(&self) -> bool {
        match self {
            Self::Structured(e) => e.retries_parse_failures(),
            Self::Scraped(e) => e.retries_parse_failures(),
            Self::RailBoard(e) => e.retries_parse_failures(),
        }
    }
}
