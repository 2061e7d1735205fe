//! # Rendering Module
//!
//! Drawing the session onto a character surface.
//!
//! [`RenderSurface`] is the seam between the map view and the output: the
//! crossterm [`TerminalDisplay`] for play, and the in-memory [`FrameBuffer`]
//! for tests and headless runs.

pub mod buffer;
pub mod display;
pub mod map_view;

pub use buffer::*;
pub use display::*;
pub use map_view::*;

use crate::CrawlResult;

/// Foreground colors used by the map view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tint {
    /// Terminal default
    #[default]
    Default,
    DarkGrey,
    Green,
    Yellow,
    White,
    Red,
}

/// Per-character styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Tint,
    pub bold: bool,
}

impl CellStyle {
    pub const fn new(fg: Tint) -> Self {
        Self { fg, bold: false }
    }

    pub const fn bold(self) -> Self {
        Self {
            fg: self.fg,
            bold: true,
        }
    }
}

/// A grid of styled characters that can be drawn on.
pub trait RenderSurface {
    /// Blanks every character of the next frame.
    fn clear(&mut self) -> CrawlResult<()>;

    /// Sets one character. Coordinates outside the surface are dropped.
    fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: CellStyle);

    /// Presents the frame.
    fn flush(&mut self) -> CrawlResult<()>;

    /// Width and height in characters.
    fn size(&self) -> (u16, u16);

    /// Writes a string left to right starting at `(x, y)`.
    fn put_str(&mut self, x: i32, y: i32, text: &str, style: CellStyle) {
        for (offset, glyph) in text.chars().enumerate() {
            self.set_cell(x + offset as i32, y, glyph, style);
        }
    }
}
