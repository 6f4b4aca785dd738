//! Display abstraction traits and shared components for Transit Board
//!
//! This crate provides:
//! - `PagedSurface` trait for full-frame paged displays (e-paper panels)
//! - `TextGrid`, a character-cell surface used by the host runner and tests
//! - `GraphicsSurface`, an adapter onto any embedded-graphics draw target
//!   (`graphics` feature)
//!
//! # Architecture
//!
//! The renderer addresses the panel in pixels, the way the device font
//! engine does: a cursor position whose `y` is the text baseline, plus
//! horizontal rules. A frame is composed between `begin_full_frame_page`
//! and `commit_page`; nothing becomes visible until commit.
//!
//! ## Paging
//!
//! Panels with a partial RAM buffer draw the frame in horizontal bands.
//! `commit_page` reports [`PageStatus::More`] until every band has been
//! drawn, and the caller replays the whole frame for each band.

#![no_std]

pub mod grid;
pub mod surface;

#[cfg(any(test, feature = "graphics"))]
pub mod graphics;

// Re-export key types
pub use grid::{TextGrid, GLYPH_WIDTH, GRID_COLS, GRID_ROWS, LINE_HEIGHT, PANEL_HEIGHT, PANEL_WIDTH};
pub use surface::{DisplayError, PageStatus, PagedSurface};

#[cfg(feature = "graphics")]
pub use graphics::{FlushTarget, GraphicsSurface};
