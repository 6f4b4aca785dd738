//! HTML table scraping
//!
//! Locates the real-time table of a stop display page and reads its rows
//! with literal marker matching. This is not an HTML parser: anything that
//! does not match the known page shape simply yields fewer rows.
//!
//! # State machine
//!
//! ```text
//! SeekTable ─► SeekRow ─► SeekCell ─► StripTags ─┐
//!                ▲  │        ▲  │                │
//!                │  │        └──┼────────────────┘
//!                │  │           ▼
//!                └──┼─────── EmitRow
//!                   ▼
//!                  Done
//! ```
//!
//! All cursors are byte offsets into the immutable page text.

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;

use heapless::Vec;

use super::{ExtractError, Extractor, Titles};
use crate::model::{Board, Departure, Section};

const TABLE_OPEN: &str = "<table class=\"rtiTable\"";
const TABLE_CLOSE: &str = "</table>";
const ROW_OPEN: &str = "<tr";
const ROW_CLOSE: &str = "</tr>";
const CELL_OPEN: &str = "<td";
const TAG_END: &str = ">";
const CELL_CLOSE: &str = "</td>";
const TITLE_MARKER: &str = "id=\"stopTitle\"";

/// Empty-cell placeholder used by the source page
const PLACEHOLDER: &str = "&nbsp;";

/// Columns read per row (service, destination, eta)
const CELLS_PER_ROW: usize = 3;

/// Extractor for scraped stop display pages
///
/// Never fails: the scraped section fills the `buses` slot and the
/// `trains` slot stays absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapedExtractor;

impl Extractor for ScrapedExtractor {
    fn extract(&self, body: &[u8], titles: &Titles<'_>) -> Result<Board, ExtractError> {
        let html = String::from_utf8_lossy(body);

        let title = match seek_title(&html) {
            Some(station) => format!("{} - {}", titles.buses, station),
            None => titles.buses.to_owned(),
        };
        let mut section = Section::new(title);
        scan_rows(&html, &mut section);

        Ok(Board {
            buses: Some(section),
            trains: None,
        })
    }

    fn retries_parse_failures(&self) -> bool {
        false
    }
}

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State<'a> {
    /// Locate the table span
    SeekTable,
    /// Locate the next row at or after `cursor` in the table
    SeekRow { cursor: usize },
    /// Locate the next cell at or after `cursor` in `row`
    SeekCell {
        row: &'a str,
        next_row: usize,
        cursor: usize,
    },
    /// Reduce the raw cell content to text
    StripTags {
        row: &'a str,
        next_row: usize,
        raw: &'a str,
        next_cell: usize,
    },
    /// Turn the accumulated cells into a departure
    EmitRow { next_row: usize },
    Done,
}

/// Run the row/cell state machine, appending departures to `section`
fn scan_rows(html: &str, section: &mut Section) {
    let mut table = "";
    let mut cells: Vec<String, CELLS_PER_ROW> = Vec::new();
    let mut state = State::SeekTable;

    loop {
        state = match state {
            State::SeekTable => match seek_table(html) {
                Some(span) => {
                    table = span;
                    State::SeekRow { cursor: 0 }
                }
                None => State::Done,
            },
            State::SeekRow { cursor } => {
                if section.is_full() {
                    State::Done
                } else {
                    match seek_row(table, cursor) {
                        Some((row, next_row)) => {
                            cells.clear();
                            State::SeekCell {
                                row,
                                next_row,
                                cursor: 0,
                            }
                        }
                        None => State::Done,
                    }
                }
            }
            State::SeekCell {
                row,
                next_row,
                cursor,
            } => {
                if cells.is_full() {
                    State::EmitRow { next_row }
                } else {
                    match seek_cell(row, cursor) {
                        Some((raw, next_cell)) => State::StripTags {
                            row,
                            next_row,
                            raw,
                            next_cell,
                        },
                        None => State::EmitRow { next_row },
                    }
                }
            }
            State::StripTags {
                row,
                next_row,
                raw,
                next_cell,
            } => {
                let text = strip_tags(raw);
                if !text.is_empty() && text != PLACEHOLDER {
                    // Only pushed while not full (checked in SeekCell)
                    let _ = cells.push(text);
                }
                State::SeekCell {
                    row,
                    next_row,
                    cursor: next_cell,
                }
            }
            State::EmitRow { next_row } => {
                if !cells.is_empty() {
                    let mut fields = cells.iter_mut().map(core::mem::take);
                    let departure = Departure::new(
                        fields.next().unwrap_or_default(),
                        fields.next().unwrap_or_default(),
                        fields.next().unwrap_or_default(),
                    );
                    // Checked in SeekRow
                    let _ = section.push(departure);
                }
                State::SeekRow { cursor: next_row }
            }
            State::Done => break,
        };
    }
}

/// Find `needle` at or after `from`
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|offset| from + offset)
}

/// Table span, from the opening marker through `</table>`
fn seek_table(html: &str) -> Option<&str> {
    let start = html.find(TABLE_OPEN)?;
    let end = find_from(html, TABLE_CLOSE, start)? + TABLE_CLOSE.len();
    Some(&html[start..end])
}

/// Next row span at or after `cursor`, plus the offset just past `</tr>`
fn seek_row(table: &str, cursor: usize) -> Option<(&str, usize)> {
    let start = find_from(table, ROW_OPEN, cursor)?;
    let end = find_from(table, ROW_CLOSE, start)?;
    Some((&table[start..end], end + ROW_CLOSE.len()))
}

/// Raw content of the next cell at or after `cursor`, plus the offset just
/// past `</td>`
fn seek_cell(row: &str, cursor: usize) -> Option<(&str, usize)> {
    let open = find_from(row, CELL_OPEN, cursor)?;
    let content = find_from(row, TAG_END, open)? + TAG_END.len();
    let close = find_from(row, CELL_CLOSE, content)?;
    Some((&row[content..close], close + CELL_CLOSE.len()))
}

/// Remove every `<...>` span
fn strip_tags(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

/// Station name from the `stopTitle` element
///
/// The element text reads like `Drummer Street - Bay 5`; only the part
/// before the first `-` is kept.
fn seek_title(html: &str) -> Option<String> {
    let marker = html.find(TITLE_MARKER)?;
    let start = find_from(html, TAG_END, marker)? + TAG_END.len();
    let end = find_from(html, "</", start)?;
    let text = strip_tags(&html[start..end]);
    let station = text.split('-').next().unwrap_or_default().trim();
    if station.is_empty() {
        None
    } else {
        Some(station.to_owned())
    }
}
