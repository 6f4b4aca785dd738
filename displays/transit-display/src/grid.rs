//! Character grid surface
//!
//! Emulates the reference 400x300 panel with a fixed-advance 9pt font as a
//! grid of character cells. Text rows are `LINE_HEIGHT` pixels tall; rules
//! snap to the boundary between two rows. The grid is double-buffered: a
//! frame is composed into the pending buffer and only replaces the visible
//! buffer on the final `commit_page`.

use core::fmt;

use heapless::String;

use crate::surface::{DisplayError, PageStatus, PagedSurface};

/// Panel width in pixels
pub const PANEL_WIDTH: u16 = 400;

/// Panel height in pixels
pub const PANEL_HEIGHT: u16 = 300;

/// Horizontal advance of one glyph in pixels
pub const GLYPH_WIDTH: i32 = 11;

/// Height of one text row in pixels
pub const LINE_HEIGHT: i32 = 25;

/// Number of character columns
pub const GRID_COLS: usize = PANEL_WIDTH as usize / GLYPH_WIDTH as usize;

/// Number of character rows
pub const GRID_ROWS: usize = PANEL_HEIGHT as usize / LINE_HEIGHT as usize;

/// Worst-case UTF-8 size of one row
pub const LINE_BYTES: usize = GRID_COLS * 4;

#[derive(Clone)]
struct Frame {
    cells: [[char; GRID_COLS]; GRID_ROWS],
    /// Rule above row `i`; index `GRID_ROWS` is the bottom edge
    rules: [bool; GRID_ROWS + 1],
}

impl Frame {
    const fn blank() -> Self {
        Self {
            cells: [[' '; GRID_COLS]; GRID_ROWS],
            rules: [false; GRID_ROWS + 1],
        }
    }
}

/// Character-cell paged surface
#[derive(Clone)]
pub struct TextGrid {
    /// What the panel currently shows
    visible: Frame,
    /// Frame being composed
    pending: Frame,
    /// Cursor (x, baseline y) in pixels
    cursor: (i32, i32),
    /// Inside a begin/commit cycle
    composing: bool,
    /// Pages per frame (1 = full buffer)
    page_count: u8,
    /// Pages committed in the current frame
    page_index: u8,
    /// Frames made visible so far
    frames: u32,
}

impl Default for TextGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TextGrid {
    /// Create a blank single-page grid
    pub const fn new() -> Self {
        Self::with_page_count(1)
    }

    /// Create a grid that needs `pages` passes per frame
    pub const fn with_page_count(pages: u8) -> Self {
        Self {
            visible: Frame::blank(),
            pending: Frame::blank(),
            cursor: (0, 0),
            composing: false,
            page_count: if pages == 0 { 1 } else { pages },
            page_index: 0,
            frames: 0,
        }
    }

    /// Get the visible text of a row, without trailing spaces
    pub fn line(&self, row: usize) -> Option<String<LINE_BYTES>> {
        let cells = self.visible.cells.get(row)?;
        let end = cells.iter().rposition(|&c| c != ' ').map_or(0, |i| i + 1);
        let mut line = String::new();
        for &c in &cells[..end] {
            // LINE_BYTES covers GRID_COLS four-byte characters
            let _ = line.push(c);
        }
        Some(line)
    }

    /// Check whether a rule is visible above `row`
    ///
    /// `row == GRID_ROWS` is the bottom edge.
    pub fn has_rule(&self, row: usize) -> bool {
        self.visible.rules.get(row).copied().unwrap_or(false)
    }

    /// Number of frames made visible
    pub fn frames_committed(&self) -> u32 {
        self.frames
    }

    /// Check if a frame is being composed
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Get number of rows
    pub const fn rows(&self) -> usize {
        GRID_ROWS
    }

    /// Get number of columns
    pub const fn cols(&self) -> usize {
        GRID_COLS
    }

    /// Write the visible frame as text, rules drawn as dashes
    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for row in 0..=GRID_ROWS {
            if self.has_rule(row) {
                for _ in 0..GRID_COLS {
                    out.write_char('-')?;
                }
                out.write_char('\n')?;
            }
            if let Some(line) = self.line(row) {
                out.write_str(&line)?;
                out.write_char('\n')?;
            }
        }
        Ok(())
    }

    fn ensure_composing(&self) -> Result<(), DisplayError> {
        if self.composing {
            Ok(())
        } else {
            Err(DisplayError::PageNotStarted)
        }
    }
}

/// Row whose glyphs sit on a baseline at `y`
///
/// Glyphs extend upward from the baseline, so a baseline on a boundary
/// belongs to the row above it.
fn text_row(y: i32) -> Option<usize> {
    usize::try_from((y - 1).div_euclid(LINE_HEIGHT))
        .ok()
        .filter(|&row| row < GRID_ROWS)
}

/// Row boundary nearest to `y`
fn rule_row(y: i32) -> Option<usize> {
    usize::try_from((y + LINE_HEIGHT / 2).div_euclid(LINE_HEIGHT))
        .ok()
        .filter(|&row| row <= GRID_ROWS)
}

impl PagedSurface for TextGrid {
    fn begin_full_frame_page(&mut self) -> Result<(), DisplayError> {
        self.pending = Frame::blank();
        self.cursor = (0, 0);
        self.page_index = 0;
        self.composing = true;
        Ok(())
    }

    fn fill_background(&mut self) -> Result<(), DisplayError> {
        self.ensure_composing()?;
        self.pending = Frame::blank();
        Ok(())
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ensure_composing()?;
        let (x, y) = self.cursor;
        let advance = i32::try_from(text.chars().count())
            .unwrap_or(i32::MAX)
            .saturating_mul(GLYPH_WIDTH);
        self.cursor = (x.saturating_add(advance), y);

        let Some(row) = text_row(y) else {
            return Ok(());
        };
        let start = x.div_euclid(GLYPH_WIDTH);
        for (offset, c) in text.chars().enumerate() {
            let col = start + offset as i32;
            if col < 0 {
                continue;
            }
            match self.pending.cells[row].get_mut(col as usize) {
                Some(cell) => *cell = c,
                None => break,
            }
        }
        Ok(())
    }

    fn draw_horizontal_line(&mut self, x0: i32, x1: i32, y: i32) -> Result<(), DisplayError> {
        self.ensure_composing()?;
        if x1 < x0 {
            return Err(DisplayError::InvalidCoordinates);
        }
        if let Some(row) = rule_row(y) {
            self.pending.rules[row] = true;
        }
        Ok(())
    }

    fn commit_page(&mut self) -> Result<PageStatus, DisplayError> {
        self.ensure_composing()?;
        self.page_index = self.page_index.saturating_add(1);
        if self.page_index < self.page_count {
            return Ok(PageStatus::More);
        }
        self.visible = self.pending.clone();
        self.composing = false;
        self.frames = self.frames.saturating_add(1);
        Ok(PageStatus::Done)
    }

    fn width(&self) -> u16 {
        PANEL_WIDTH
    }

    fn height(&self) -> u16 {
        PANEL_HEIGHT
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TextGrid {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "TextGrid[");
        for row in 0..GRID_ROWS {
            if row > 0 {
                defmt::write!(f, ", ");
            }
            if let Some(line) = self.line(row) {
                defmt::write!(f, "{}", line.as_str());
            }
        }
        defmt::write!(f, "]");
    }
}
