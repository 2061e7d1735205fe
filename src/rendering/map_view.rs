//! Draws a session onto a render surface.
//!
//! Axial maps are drawn one character per cell with odd rows shifted right.
//! Hex-parity maps are drawn as 3x4 hexagons:
//!
//! ```text
//! ---
//! \./
//! /.\
//! ---
//! ```
//!
//! Tokens replace the whole hexagon in their own color.

use crate::game::{CellKind, GridConvention, Position, SessionState};
use crate::rendering::{CellStyle, RenderSurface, Tint};
use crate::CrawlResult;

/// Frames of the activity spinner below the map.
pub const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub const WALL_GLYPH: char = '#';
pub const FLOOR_GLYPH: char = '.';
pub const TARGET_GLYPH: char = '*';
pub const OFFSET_PLAYER_GLYPH: char = '@';
pub const HEX_PLAYER_GLYPH: char = '&';
pub const EXIT_GLYPH: char = 'X';

const WALL_STYLE: CellStyle = CellStyle::new(Tint::DarkGrey);
const FLOOR_STYLE: CellStyle = CellStyle::new(Tint::Default);
const TARGET_STYLE: CellStyle = CellStyle::new(Tint::Yellow);
const OFFSET_PLAYER_STYLE: CellStyle = CellStyle::new(Tint::Green).bold();
const HEX_PLAYER_STYLE: CellStyle = CellStyle::new(Tint::White);
const EXIT_STYLE: CellStyle = CellStyle::new(Tint::Red).bold();
const STATUS_STYLE: CellStyle = CellStyle::new(Tint::White);

/// Renders the map, tokens and status line of a session.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapView;

impl MapView {
    pub fn new() -> Self {
        Self
    }

    /// Draws one complete frame and flushes it.
    pub fn render<S: RenderSurface + ?Sized>(
        &self,
        session: &SessionState,
        surface: &mut S,
    ) -> CrawlResult<()> {
        surface.clear()?;
        self.draw(session, surface);
        surface.flush()
    }

    /// Draws one frame without clearing or flushing.
    pub fn draw<S: RenderSurface + ?Sized>(&self, session: &SessionState, surface: &mut S) {
        let grid = session.grid();
        let convention = grid.convention();

        for (pos, kind) in grid.cells() {
            let (glyph, style) = match kind {
                CellKind::Wall => (WALL_GLYPH, WALL_STYLE),
                CellKind::Floor => (FLOOR_GLYPH, FLOOR_STYLE),
            };
            draw_cell(surface, convention, pos, glyph, style);
        }

        if let Some(target) = session.target() {
            draw_cell(surface, convention, target, TARGET_GLYPH, TARGET_STYLE);
        }
        if let Some(exit) = session.exit() {
            draw_cell(surface, convention, exit, EXIT_GLYPH, EXIT_STYLE);
        }

        let (player_glyph, player_style) = match convention {
            GridConvention::Axial => (OFFSET_PLAYER_GLYPH, OFFSET_PLAYER_STYLE),
            GridConvention::HexParity => (HEX_PLAYER_GLYPH, HEX_PLAYER_STYLE),
        };
        draw_cell(surface, convention, session.player(), player_glyph, player_style);

        let (_, map_rows) = convention.screen_extent(grid.width(), grid.height());
        let status_row = map_rows as i32;
        let spinner = SPINNER[(session.frame() % SPINNER.len() as u64) as usize];
        surface.set_cell(0, status_row, spinner, STATUS_STYLE);
        if session.config().exit {
            surface.put_str(
                2,
                status_row,
                &format!("depth {}", session.depth()),
                STATUS_STYLE,
            );
        }
    }
}

/// Draws one cell glyph at its screen position.
pub fn draw_cell<S: RenderSurface + ?Sized>(
    surface: &mut S,
    convention: GridConvention,
    pos: Position,
    glyph: char,
    style: CellStyle,
) {
    let (column, row) = convention.cell_to_screen(pos);
    match convention {
        GridConvention::Axial => surface.set_cell(column, row, glyph, style),
        GridConvention::HexParity => {
            surface.put_str(column, row, "---", style);
            surface.set_cell(column, row + 1, '\\', style);
            surface.set_cell(column + 1, row + 1, glyph, style);
            surface.set_cell(column + 2, row + 1, '/', style);
            surface.set_cell(column, row + 2, '/', style);
            surface.set_cell(column + 1, row + 2, glyph, style);
            surface.set_cell(column + 2, row + 2, '\\', style);
            surface.put_str(column, row + 3, "---", style);
        }
    }
}
