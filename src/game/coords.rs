//! # Coordinate Conventions
//!
//! The two addressing schemes a map can use. A [`Grid`](crate::Grid) carries
//! its convention, so generation, movement, input and rendering of one map
//! always agree on adjacency and screen layout.

use crate::game::{Axial, Position};
use serde::{Deserialize, Serialize};

/// Axial neighbor offsets, shared by both conventions after conversion.
pub const AXIAL_NEIGHBORS: [Axial; 6] = [
    Axial { q: -1, r: 0 },
    Axial { q: -1, r: 1 },
    Axial { q: 0, r: 1 },
    Axial { q: 1, r: 0 },
    Axial { q: 1, r: -1 },
    Axial { q: 0, r: -1 },
];

/// Width and height in characters of one hex-parity cell glyph.
pub const HEX_GLYPH_WIDTH: i32 = 3;
pub const HEX_GLYPH_HEIGHT: i32 = 4;

/// Grid addressing conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridConvention {
    /// Every integer pair in bounds is a cell; stored positions are axial
    /// `(q, r)` directly. Drawn as single characters with odd rows shifted
    /// right by one column.
    Axial,
    /// Only positions whose `x` and `y` share parity are cells. This is an
    /// axial grid stored with doubled rows, drawn as 3x4 hexagons that
    /// interlock like bricks.
    HexParity,
}

impl GridConvention {
    /// Checks whether a position is an addressable cell of a `width` x
    /// `height` grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{GridConvention, Position};
    ///
    /// assert!(GridConvention::Axial.is_valid(Position::new(1, 2), 4, 4));
    /// assert!(!GridConvention::HexParity.is_valid(Position::new(1, 2), 4, 4));
    /// assert!(GridConvention::HexParity.is_valid(Position::new(1, 3), 4, 4));
    /// ```
    pub fn is_valid(self, pos: Position, width: u32, height: u32) -> bool {
        let in_bounds =
            pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < width && (pos.y as u32) < height;
        in_bounds && self.has_valid_parity(pos)
    }

    /// Checks the parity rule alone, ignoring bounds.
    pub fn has_valid_parity(self, pos: Position) -> bool {
        match self {
            GridConvention::Axial => true,
            GridConvention::HexParity => pos.x.rem_euclid(2) == pos.y.rem_euclid(2),
        }
    }

    /// Converts a stored position to axial coordinates.
    pub fn to_axial(self, pos: Position) -> Axial {
        match self {
            GridConvention::Axial => Axial::new(pos.x, pos.y),
            GridConvention::HexParity => Axial::new(pos.x, (pos.y - pos.x).div_euclid(2)),
        }
    }

    /// Converts axial coordinates back to a stored position.
    ///
    /// The result always satisfies the parity rule.
    pub fn from_axial(self, axial: Axial) -> Position {
        match self {
            GridConvention::Axial => Position::new(axial.q, axial.r),
            GridConvention::HexParity => Position::new(axial.q, 2 * axial.r + axial.q),
        }
    }

    /// Returns the six neighbors of a position, in the order of
    /// [`AXIAL_NEIGHBORS`]. Neighbors may lie outside the grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{GridConvention, Position};
    ///
    /// let around = GridConvention::HexParity.neighbors(Position::new(2, 2));
    /// assert!(around.contains(&Position::new(2, 4)));
    /// assert!(around.contains(&Position::new(3, 1)));
    /// assert!(!around.contains(&Position::new(4, 2)));
    /// ```
    pub fn neighbors(self, pos: Position) -> [Position; 6] {
        let axial = self.to_axial(pos);
        AXIAL_NEIGHBORS.map(|delta| self.from_axial(axial + delta))
    }

    /// Returns the screen column and row of the top-left character of a
    /// cell's glyph.
    pub fn cell_to_screen(self, pos: Position) -> (i32, i32) {
        match self {
            GridConvention::Axial => (pos.x * 2 + pos.y.rem_euclid(2), pos.y),
            GridConvention::HexParity => (pos.x * HEX_GLYPH_WIDTH, pos.y * 2),
        }
    }

    /// Maps a screen character back to the cell whose glyph covers it.
    ///
    /// Returns `None` for characters left of or above the first cell. Bounds
    /// against a concrete grid are the caller's concern.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{GridConvention, Position};
    ///
    /// // Row 1 is shifted right by one column.
    /// assert_eq!(GridConvention::Axial.screen_to_cell(5, 1), Some(Position::new(2, 1)));
    /// assert_eq!(GridConvention::Axial.screen_to_cell(0, 1), None);
    ///
    /// // Row 3 is covered by glyphs of rows 0 and 1; parity picks row 1 in column 1.
    /// assert_eq!(GridConvention::HexParity.screen_to_cell(4, 3), Some(Position::new(1, 1)));
    /// ```
    pub fn screen_to_cell(self, column: i32, row: i32) -> Option<Position> {
        if column < 0 || row < 0 {
            return None;
        }

        match self {
            GridConvention::Axial => {
                let shifted = column - row.rem_euclid(2);
                if shifted < 0 {
                    None
                } else {
                    Some(Position::new(shifted / 2, row))
                }
            }
            GridConvention::HexParity => {
                let x = column / HEX_GLYPH_WIDTH;
                // Each row is covered by the glyphs of rows row/2 and row/2 - 1;
                // only one of them has the parity of x.
                let lower = row / 2;
                let y = if lower.rem_euclid(2) == x.rem_euclid(2) {
                    lower
                } else {
                    lower - 1
                };
                if y < 0 {
                    None
                } else {
                    Some(Position::new(x, y))
                }
            }
        }
    }

    /// Lists every screen character covered by a cell's glyph.
    pub fn footprint(self, pos: Position) -> Vec<(i32, i32)> {
        let (column, row) = self.cell_to_screen(pos);
        match self {
            GridConvention::Axial => vec![(column, row)],
            GridConvention::HexParity => (0..HEX_GLYPH_HEIGHT)
                .flat_map(|dy| (0..HEX_GLYPH_WIDTH).map(move |dx| (column + dx, row + dy)))
                .collect(),
        }
    }

    /// Returns the screen size in characters needed to draw a whole grid.
    pub fn screen_extent(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            GridConvention::Axial => (width * 2 + 1, height),
            GridConvention::HexParity => (
                width * HEX_GLYPH_WIDTH as u32,
                height * 2 + (HEX_GLYPH_HEIGHT as u32 - 2),
            ),
        }
    }
}
