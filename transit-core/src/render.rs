//! Section rendering
//!
//! Lays a section out as a header band followed by rows on a fixed line
//! pitch:
//!
//! ```text
//! ──────────────────────────  top_y - line_height
//! Buses - Drummer Street      baseline top_y - padding_bottom
//! ──────────────────────────  top_y
//! 1     Fulbourn       4      baseline top_y + line_height
//! U     Eddington      Due    baseline top_y + 2 * line_height
//! ```

use serde::{Deserialize, Serialize};
use transit_display::{DisplayError, PagedSurface};

use crate::format::ColumnLayout;
use crate::model::{Section, MAX_ROWS_PER_SECTION};

/// Vertical layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct Layout {
    /// Line pitch in pixels
    pub line_height: i32,
    /// Gap between the header baseline and the rule below it
    pub padding_bottom: i32,
    /// Rows drawn per section
    pub max_rows: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            line_height: 25,
            padding_bottom: 7,
            max_rows: MAX_ROWS_PER_SECTION,
        }
    }
}

impl Layout {
    /// Header rule position of the `index`-th section block
    ///
    /// Each block spans the header line, `max_rows` rows and one spare
    /// line, so block 0 sits at one pitch and block 1 at
    /// `line_height * (max_rows + 2)`.
    pub fn section_top(&self, index: usize) -> i32 {
        let lines = 1 + index * (self.max_rows + 1);
        self.line_height * lines as i32
    }
}

/// Draws sections onto a paged surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionRenderer {
    layout: Layout,
    columns: ColumnLayout,
}

impl SectionRenderer {
    /// Create a renderer
    pub fn new(layout: Layout, columns: ColumnLayout) -> Self {
        Self { layout, columns }
    }

    /// Vertical layout in use
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Draw one section with its header rule at `top_y`
    ///
    /// An absent section draws only the header with `fallback_title`.
    /// Returns the number of rows drawn.
    pub fn render<S: PagedSurface>(
        &self,
        surface: &mut S,
        section: Option<&Section>,
        top_y: i32,
        fallback_title: &str,
    ) -> Result<usize, DisplayError> {
        let title = section.map_or(fallback_title, |s| s.title.as_str());
        self.render_header(surface, title, top_y)?;

        let Some(section) = section else {
            return Ok(0);
        };

        let mut drawn = 0;
        let mut y = top_y;
        for departure in section.departures() {
            if drawn >= self.layout.max_rows {
                break;
            }
            let row = self.columns.format_departure(departure);
            if row.is_empty() {
                continue;
            }
            y += self.layout.line_height;
            surface.set_cursor(0, y);
            surface.draw_text(&row)?;
            drawn += 1;
        }

        Ok(drawn)
    }

    fn render_header<S: PagedSurface>(
        &self,
        surface: &mut S,
        title: &str,
        top_y: i32,
    ) -> Result<(), DisplayError> {
        let right = i32::from(surface.width()) - 1;

        surface.set_cursor(0, top_y - self.layout.padding_bottom);
        surface.draw_text(title)?;
        surface.draw_horizontal_line(0, right, top_y)?;
        surface.draw_horizontal_line(0, right, top_y - self.layout.line_height)?;
        Ok(())
    }
}
