//! # Cell Grid
//!
//! The bounded map produced by generation. Every addressable position holds
//! exactly one [`CellKind`]; positions outside the bounds, or with the wrong
//! parity in the hex-parity convention, are never stored or returned.

use crate::game::{GridConvention, Position};
use crate::{CrawlError, CrawlResult};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Kind of a single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Wall,
    Floor,
}

impl CellKind {
    /// Checks if the cell can be walked on.
    pub fn is_passable(self) -> bool {
        matches!(self, CellKind::Floor)
    }
}

/// A `width` x `height` map of cells in one coordinate convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    convention: GridConvention,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates a grid with every cell set to [`CellKind::Wall`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{CellKind, Grid, GridConvention, Position};
    ///
    /// let grid = Grid::new(4, 3, GridConvention::Axial);
    /// assert_eq!(grid.get(Position::new(3, 2)), Some(CellKind::Wall));
    /// assert_eq!(grid.get(Position::new(4, 2)), None);
    /// ```
    pub fn new(width: u32, height: u32, convention: GridConvention) -> Self {
        Self::filled(width, height, convention, CellKind::Wall)
    }

    /// Creates a grid with every cell set to `kind`.
    pub fn filled(width: u32, height: u32, convention: GridConvention, kind: CellKind) -> Self {
        Self {
            width,
            height,
            convention,
            cells: vec![kind; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn convention(&self) -> GridConvention {
        self.convention
    }

    /// Checks whether a position is an addressable cell of this grid.
    pub fn is_valid(&self, pos: Position) -> bool {
        self.convention.is_valid(pos, self.width, self.height)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.is_valid(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Gets the kind of a cell, or `None` if the position is not addressable.
    pub fn get(&self, pos: Position) -> Option<CellKind> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Sets the kind of a cell.
    ///
    /// Fails with [`CrawlError::OutOfBounds`] for positions that are not
    /// addressable in this grid.
    pub fn set(&mut self, pos: Position, kind: CellKind) -> CrawlResult<()> {
        let index = self.index(pos).ok_or(CrawlError::OutOfBounds(pos))?;
        self.cells[index] = kind;
        Ok(())
    }

    /// Turns a wall into floor.
    ///
    /// Floor stays floor and unaddressable positions are skipped. Returns
    /// whether the cell changed.
    pub fn carve(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(index) if self.cells[index] == CellKind::Wall => {
                self.cells[index] = CellKind::Floor;
                true
            }
            _ => false,
        }
    }

    /// Checks if a position is an addressable floor cell.
    pub fn is_floor(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(CellKind::is_passable)
    }

    /// Iterates over every addressable position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
            .filter(move |&pos| self.convention.has_valid_parity(pos))
    }

    /// Iterates over every addressable cell with its kind.
    pub fn cells(&self) -> impl Iterator<Item = (Position, CellKind)> + '_ {
        self.positions().map(move |pos| (pos, self.cells[self.index_unchecked(pos)]))
    }

    fn index_unchecked(&self, pos: Position) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Collects every floor position.
    pub fn floor_positions(&self) -> Vec<Position> {
        self.cells()
            .filter(|(_, kind)| kind.is_passable())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Counts floor cells.
    pub fn floor_count(&self) -> usize {
        self.cells().filter(|(_, kind)| kind.is_passable()).count()
    }

    /// Returns the addressable floor neighbors of a position.
    pub fn floor_neighbors(&self, pos: Position) -> Vec<Position> {
        self.convention
            .neighbors(pos)
            .into_iter()
            .filter(|&neighbor| self.is_floor(neighbor))
            .collect()
    }

    /// Picks a uniformly random floor cell.
    ///
    /// The search is a single pass over the grid; a map without floor yields
    /// [`CrawlError::NoReachableFloor`] instead of retrying forever.
    pub fn random_floor<R: Rng + ?Sized>(&self, rng: &mut R) -> CrawlResult<Position> {
        self.floor_positions()
            .choose(rng)
            .copied()
            .ok_or(CrawlError::NoReachableFloor)
    }
}
