//! Paged display surface trait
//!
//! Defines the drawing interface the section renderer targets.

use core::fmt;

/// Display surface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
    /// Buffer overflow
    BufferOverflow,
    /// Drawing call issued outside a begin/commit cycle
    PageNotStarted,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Communication => write!(f, "display communication error"),
            Self::InvalidCoordinates => write!(f, "invalid display coordinates"),
            Self::NotInitialized => write!(f, "display not initialized"),
            Self::BufferOverflow => write!(f, "display buffer overflow"),
            Self::PageNotStarted => write!(f, "draw call outside of a page cycle"),
        }
    }
}

/// Result of committing one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageStatus {
    /// Another page follows; replay the frame
    More,
    /// Frame complete and visible
    Done,
}

/// Paged display surface
///
/// Provides a hardware-agnostic, full-frame drawing interface. Coordinates
/// are in pixels; `set_cursor` positions the baseline of the next text.
///
/// Call order per frame:
///
/// ```text
/// begin_full_frame_page()
/// loop {
///     fill_background()
///     set_cursor / draw_text / draw_horizontal_line ...
///     if commit_page()? == Done { break }
/// }
/// ```
pub trait PagedSurface {
    /// Start composing a full-window frame
    fn begin_full_frame_page(&mut self) -> Result<(), DisplayError>;

    /// Clear the current page to the background colour
    fn fill_background(&mut self) -> Result<(), DisplayError>;

    /// Move the text cursor (x, baseline y) in pixels
    fn set_cursor(&mut self, x: i32, y: i32);

    /// Draw text at the cursor and advance it
    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Draw a horizontal line from `x0` to `x1` (inclusive) at `y`
    fn draw_horizontal_line(&mut self, x0: i32, x1: i32, y: i32) -> Result<(), DisplayError>;

    /// Finish the current page
    ///
    /// Returns [`PageStatus::More`] while further pages remain.
    fn commit_page(&mut self) -> Result<PageStatus, DisplayError>;

    /// Panel width in pixels
    fn width(&self) -> u16;

    /// Panel height in pixels
    fn height(&self) -> u16;
}
