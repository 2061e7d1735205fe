//! In-memory frame buffer of styled characters.

use crate::rendering::{CellStyle, RenderSurface};
use crate::CrawlResult;

/// A single character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            style: CellStyle::default(),
        }
    }
}

/// 2D buffer of styled character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resizes and blanks the buffer, reusing the allocation.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, Cell::default());
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Gets the character at `(x, y)`, or a space outside the buffer.
    pub fn glyph_at(&self, x: i32, y: i32) -> char {
        self.get(x, y).map_or(' ', |cell| cell.glyph)
    }

    /// Collects one row as a string, trailing spaces included.
    pub fn row_text(&self, y: u16) -> String {
        (0..i32::from(self.width))
            .map(|x| self.glyph_at(x, i32::from(y)))
            .collect()
    }

    /// Finds every position holding `glyph`, in row-major order.
    pub fn find(&self, glyph: char) -> Vec<(u16, u16)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.glyph == glyph)
            .map(|(i, _)| {
                (
                    (i % self.width as usize) as u16,
                    (i / self.width as usize) as u16,
                )
            })
            .collect()
    }
}

impl RenderSurface for FrameBuffer {
    fn clear(&mut self) -> CrawlResult<()> {
        self.cells.fill(Cell::default());
        Ok(())
    }

    fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: CellStyle) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { glyph, style };
        }
    }

    fn flush(&mut self) -> CrawlResult<()> {
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}
