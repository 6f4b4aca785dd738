//! Terminal panel
//!
//! Renders into a [`TextGrid`] and prints the finished frame, so the board
//! can be previewed without hardware.

use std::io::{self, Write};

use transit_display::{DisplayError, PageStatus, PagedSurface, TextGrid};

/// Frame border width: grid columns plus the two side bars
const BORDER_WIDTH: usize = transit_display::GRID_COLS + 2;

/// Paged surface printing each completed frame to a writer
pub struct TerminalSurface<W> {
    grid: TextGrid,
    out: W,
}

impl TerminalSurface<io::Stdout> {
    /// Print frames to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            grid: TextGrid::new(),
            out,
        }
    }

    fn print_frame(&mut self) -> io::Result<()> {
        let mut frame = String::new();
        self.grid
            .write_to(&mut frame)
            .map_err(|_| io::Error::other("frame formatting failed"))?;

        let border = "-".repeat(BORDER_WIDTH);
        writeln!(self.out, "{border}")?;
        for line in frame.lines() {
            writeln!(self.out, "|{line:<width$}|", width = BORDER_WIDTH - 2)?;
        }
        writeln!(self.out, "{border}")?;
        self.out.flush()
    }
}

impl<W: Write> PagedSurface for TerminalSurface<W> {
    fn begin_full_frame_page(&mut self) -> Result<(), DisplayError> {
        self.grid.begin_full_frame_page()
    }

    fn fill_background(&mut self) -> Result<(), DisplayError> {
        self.grid.fill_background()
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.grid.set_cursor(x, y);
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.grid.draw_text(text)
    }

    fn draw_horizontal_line(&mut self, x0: i32, x1: i32, y: i32) -> Result<(), DisplayError> {
        self.grid.draw_horizontal_line(x0, x1, y)
    }

    fn commit_page(&mut self) -> Result<PageStatus, DisplayError> {
        let status = self.grid.commit_page()?;
        if status == PageStatus::Done {
            self.print_frame()
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(status)
    }

    fn width(&self) -> u16 {
        self.grid.width()
    }

    fn height(&self) -> u16 {
        self.grid.height()
    }
}
