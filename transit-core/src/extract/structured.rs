//! JSON feed extraction
//!
//! Feed shape:
//!
//! ```json
//! {
//!   "time": "12:34",
//!   "bus_info":   { "title": "...", "departures": [ { "service": "", "dest": "", "eta": "" } ] },
//!   "train_info": { "title": "...", "departures": [ ... ] }
//! }
//! ```
//!
//! Every key is optional. Unknown keys are ignored and non-string field
//! values read as empty text.

use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value};

use super::{ExtractError, Extractor, Titles};
use crate::format::TRANSIT_COLUMNS;
use crate::model::{Board, Departure, Section};

/// Largest body accepted for parsing (bytes)
pub const JSON_DOC_CAPACITY: usize = 8192;

/// Extractor for the pre-processed JSON feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuredExtractor;

impl Extractor for StructuredExtractor {
    fn extract(&self, body: &[u8], titles: &Titles<'_>) -> Result<Board, ExtractError> {
        if body.len() > JSON_DOC_CAPACITY {
            return Err(ExtractError::DocumentTooLarge);
        }

        let root: Value = serde_json::from_slice(body).map_err(|_| ExtractError::Malformed)?;
        let root = root.as_object().ok_or(ExtractError::Malformed)?;

        Ok(Board {
            buses: Some(section_from(root, "bus_info", titles.buses)),
            trains: Some(section_from(root, "train_info", titles.trains)),
        })
    }
}

fn section_from(root: &Map<String, Value>, key: &str, fallback: &str) -> Section {
    let Some(info) = root.get(key).and_then(Value::as_object) else {
        return Section::new(fallback);
    };

    let title = info.get("title").and_then(Value::as_str).unwrap_or(fallback);
    let mut section = Section::new(title);

    let entries = info
        .get("departures")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for entry in entries {
        if section.is_full() {
            break;
        }
        let departure = Departure::new(
            text_field(entry, "service"),
            text_field(entry, "dest"),
            text_field(entry, "eta"),
        );
        if TRANSIT_COLUMNS.format_departure(&departure).is_empty() {
            continue;
        }
        // Capacity checked above
        let _ = section.push(departure);
    }

    section
}

fn text_field<'a>(entry: &'a Value, key: &str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or("")
}
