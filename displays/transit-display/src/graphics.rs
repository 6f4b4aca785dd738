//! embedded-graphics adapter
//!
//! Drives any monochrome `DrawTarget` (an e-paper driver's frame buffer,
//! the desktop simulator) through the `PagedSurface` interface. The whole
//! frame is drawn into the target's buffer in one page; `FlushTarget`
//! pushes it to the glass on commit.

use embedded_graphics::mono_font::ascii::FONT_9X18_BOLD;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};

use crate::surface::{DisplayError, PageStatus, PagedSurface};

/// Colour of the paper
pub const BACKGROUND: BinaryColor = BinaryColor::Off;

/// Colour of text and rules
pub const INK: BinaryColor = BinaryColor::On;

/// Frame buffer that can be pushed to the panel
pub trait FlushTarget {
    /// Transfer the buffer and refresh the panel
    fn flush_frame(&mut self) -> Result<(), DisplayError>;
}

/// `PagedSurface` over an embedded-graphics draw target
pub struct GraphicsSurface<D> {
    target: D,
    cursor: Point,
    composing: bool,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget<Color = BinaryColor> + FlushTarget,
{
    /// Wrap a draw target
    pub fn new(target: D) -> Self {
        Self {
            target,
            cursor: Point::zero(),
            composing: false,
        }
    }

    /// Borrow the underlying target
    pub fn target(&self) -> &D {
        &self.target
    }

    /// Release the underlying target
    pub fn into_inner(self) -> D {
        self.target
    }

    fn ensure_composing(&self) -> Result<(), DisplayError> {
        if self.composing {
            Ok(())
        } else {
            Err(DisplayError::PageNotStarted)
        }
    }
}

impl<D> PagedSurface for GraphicsSurface<D>
where
    D: DrawTarget<Color = BinaryColor> + FlushTarget,
{
    fn begin_full_frame_page(&mut self) -> Result<(), DisplayError> {
        self.cursor = Point::zero();
        self.composing = true;
        Ok(())
    }

    fn fill_background(&mut self) -> Result<(), DisplayError> {
        self.ensure_composing()?;
        self.target
            .clear(BACKGROUND)
            .map_err(|_| DisplayError::Communication)
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ensure_composing()?;
        let style = MonoTextStyle::new(&FONT_9X18_BOLD, INK);
        self.cursor = Text::with_baseline(text, self.cursor, style, Baseline::Alphabetic)
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)?;
        Ok(())
    }

    fn draw_horizontal_line(&mut self, x0: i32, x1: i32, y: i32) -> Result<(), DisplayError> {
        self.ensure_composing()?;
        if x1 < x0 {
            return Err(DisplayError::InvalidCoordinates);
        }
        Line::new(Point::new(x0, y), Point::new(x1, y))
            .into_styled(PrimitiveStyle::with_stroke(INK, 1))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn commit_page(&mut self) -> Result<PageStatus, DisplayError> {
        self.ensure_composing()?;
        self.composing = false;
        self.target.flush_frame()?;
        Ok(PageStatus::Done)
    }

    fn width(&self) -> u16 {
        u16::try_from(self.target.bounding_box().size.width).unwrap_or(u16::MAX)
    }

    fn height(&self) -> u16 {
        u16::try_from(self.target.bounding_box().size.height).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 64;
    const H: usize = 32;

    struct MockPanel {
        pixels: [[bool; W]; H],
        flushes: u8,
    }

    impl MockPanel {
        fn new() -> Self {
            Self {
                pixels: [[false; W]; H],
                flushes: 0,
            }
        }

        fn ink_count(&self) -> usize {
            self.pixels.iter().flatten().filter(|&&p| p).count()
        }
    }

    impl DrawTarget for MockPanel {
        type Color = BinaryColor;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                    if x < W && y < H {
                        self.pixels[y][x] = color.is_on();
                    }
                }
            }
            Ok(())
        }
    }

    impl OriginDimensions for MockPanel {
        fn size(&self) -> Size {
            Size::new(W as u32, H as u32)
        }
    }

    impl FlushTarget for MockPanel {
        fn flush_frame(&mut self) -> Result<(), DisplayError> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_dimensions_from_target() {
        let surface = GraphicsSurface::new(MockPanel::new());
        assert_eq!(surface.width(), 64);
        assert_eq!(surface.height(), 32);
    }

    #[test]
    fn test_horizontal_line_pixels() {
        let mut surface = GraphicsSurface::new(MockPanel::new());
        surface.begin_full_frame_page().unwrap();
        surface.fill_background().unwrap();
        surface.draw_horizontal_line(0, 9, 3).unwrap();
        assert_eq!(surface.commit_page().unwrap(), PageStatus::Done);

        let panel = surface.into_inner();
        assert!(panel.pixels[3][0]);
        assert!(panel.pixels[3][9]);
        assert!(!panel.pixels[3][10]);
        assert_eq!(panel.ink_count(), 10);
        assert_eq!(panel.flushes, 1);
    }

    #[test]
    fn test_text_advances_cursor() {
        let mut surface = GraphicsSurface::new(MockPanel::new());
        surface.begin_full_frame_page().unwrap();
        surface.set_cursor(0, 14);
        surface.draw_text("A").unwrap();
        assert_eq!(surface.cursor, Point::new(9, 14));
        surface.commit_page().unwrap();
        assert!(surface.target().ink_count() > 0);
    }

    #[test]
    fn test_fill_background_clears() {
        let mut surface = GraphicsSurface::new(MockPanel::new());
        surface.begin_full_frame_page().unwrap();
        surface.draw_horizontal_line(0, 63, 0).unwrap();
        surface.fill_background().unwrap();
        surface.commit_page().unwrap();
        assert_eq!(surface.target().ink_count(), 0);
    }

    #[test]
    fn test_draw_requires_page() {
        let mut surface = GraphicsSurface::new(MockPanel::new());
        assert_eq!(
            surface.draw_horizontal_line(0, 1, 0),
            Err(DisplayError::PageNotStarted)
        );
    }
}
