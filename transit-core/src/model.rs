//! Departure data model
//!
//! Everything here is rebuilt from scratch on every refresh cycle.

use alloc::string::String;

use heapless::Vec;

/// Row cap: maximum departures held (and drawn) per section
pub const MAX_ROWS_PER_SECTION: usize = 5;

/// One transit arrival record
///
/// All fields are display text; nothing is parsed as a number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Departure {
    /// Short service code (line number, "BUS", ...)
    pub service: String,
    /// Destination name
    pub destination: String,
    /// Time to departure ("4", "Due", "12:34")
    pub eta: String,
}

impl Departure {
    /// Create a departure from its three fields
    pub fn new(
        service: impl Into<String>,
        destination: impl Into<String>,
        eta: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            destination: destination.into(),
            eta: eta.into(),
        }
    }

    /// Check if every field is empty
    pub fn is_blank(&self) -> bool {
        self.service.is_empty() && self.destination.is_empty() && self.eta.is_empty()
    }
}

/// A titled block of departures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Header text
    pub title: String,
    /// Departures in display order
    departures: Vec<Departure, MAX_ROWS_PER_SECTION>,
}

impl Section {
    /// Create an empty section
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            departures: Vec::new(),
        }
    }

    /// Append a departure
    ///
    /// Returns the departure back if the row cap is reached.
    pub fn push(&mut self, departure: Departure) -> Result<(), Departure> {
        self.departures.push(departure)
    }

    /// Departures in display order
    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    /// Number of departures
    pub fn len(&self) -> usize {
        self.departures.len()
    }

    /// Check if the section has no departures
    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    /// Check if the row cap is reached
    pub fn is_full(&self) -> bool {
        self.departures.is_full()
    }
}

/// Extraction result: the two display blocks
///
/// `None` means the feed variant does not provide that block at all;
/// it is drawn as a bare header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    /// Upper block
    pub buses: Option<Section>,
    /// Lower block
    pub trains: Option<Section>,
}

impl Board {
    /// Total departures across both blocks
    pub fn row_count(&self) -> usize {
        self.buses.as_ref().map_or(0, Section::len) + self.trains.as_ref().map_or(0, Section::len)
    }
}
