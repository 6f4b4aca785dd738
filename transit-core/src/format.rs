//! Fixed-width row formatting
//!
//! Every departure becomes one line of exactly [`ROW_WIDTH`] characters:
//! three columns padded or cut to their widths, separated by spaces.
//! Widths count characters, so a multi-byte name never splits a code point.

use alloc::string::String;

use crate::model::Departure;

/// Spaces between columns
pub const COLUMN_SPACING: usize = 3;

/// Service column width
pub const SERVICE_WIDTH: usize = 3;

/// Destination column width
pub const DESTINATION_WIDTH: usize = 20;

/// ETA column width
pub const ETA_WIDTH: usize = 7;

/// Total formatted row width
pub const ROW_WIDTH: usize = TRANSIT_COLUMNS.row_width();

/// Departure board columns (service, destination, eta)
pub const TRANSIT_COLUMNS: ColumnLayout = ColumnLayout {
    widths: [SERVICE_WIDTH, DESTINATION_WIDTH, ETA_WIDTH],
    spacing: COLUMN_SPACING,
};

/// Three-column fixed-width layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColumnLayout {
    /// Column widths in characters
    pub widths: [usize; 3],
    /// Spaces between adjacent columns
    pub spacing: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        TRANSIT_COLUMNS
    }
}

impl ColumnLayout {
    /// Width of a formatted row
    pub const fn row_width(&self) -> usize {
        self.widths[0] + self.widths[1] + self.widths[2] + self.spacing * 2
    }

    /// Format three fields into one row
    pub fn format(&self, service: &str, destination: &str, eta: &str) -> String {
        let mut row = String::with_capacity(self.row_width());
        for (index, (field, width)) in [service, destination, eta]
            .into_iter()
            .zip(self.widths)
            .enumerate()
        {
            if index > 0 {
                pad(&mut row, self.spacing);
            }
            fit(&mut row, field, width);
        }
        row
    }

    /// Format a departure into one row
    pub fn format_departure(&self, departure: &Departure) -> String {
        self.format(&departure.service, &departure.destination, &departure.eta)
    }
}

/// Format with the departure board columns
pub fn format_row(service: &str, destination: &str, eta: &str) -> String {
    TRANSIT_COLUMNS.format(service, destination, eta)
}

/// Append `text` padded with spaces or cut to exactly `width` characters
pub fn fit(out: &mut String, text: &str, width: usize) {
    let mut used = 0;
    for c in text.chars().take(width) {
        out.push(c);
        used += 1;
    }
    pad(out, width - used);
}

fn pad(out: &mut String, count: usize) {
    out.extend(core::iter::repeat_n(' ', count));
}
