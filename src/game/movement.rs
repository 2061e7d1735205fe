//! # Movement Resolver
//!
//! Greedy single-step movement toward a target cell.
//!
//! The rule works in axial coordinates so both conventions share it: move one
//! unit along `q` when the target is further away along `q` than along `r`,
//! otherwise one unit along `r`. A step into anything but floor is rejected
//! and the mover stays put.
//!
//! This is not pathfinding. The rule stalls or oscillates in front of concave
//! walls, and callers are expected to live with that.

use crate::game::{Axial, Direction, Grid, Position};

/// Computes the next position when walking from `current` toward `target`.
///
/// # Examples
///
/// ```
/// use hexcrawl::{step, CellKind, Grid, GridConvention, Position};
///
/// let grid = Grid::filled(8, 8, GridConvention::Axial, CellKind::Floor);
/// assert_eq!(step(Position::new(0, 0), Position::new(5, 0), &grid), Position::new(1, 0));
/// assert_eq!(step(Position::new(0, 0), Position::new(3, 3), &grid), Position::new(0, 1));
/// ```
pub fn step(current: Position, target: Position, grid: &Grid) -> Position {
    if current == target {
        return current;
    }

    let convention = grid.convention();
    let from = convention.to_axial(current);
    let to = convention.to_axial(target);
    let dq = to.q - from.q;
    let dr = to.r - from.r;

    let delta = if dq.abs() > dr.abs() {
        Axial::new(dq.signum(), 0)
    } else {
        Axial::new(0, dr.signum())
    };

    let proposed = convention.from_axial(from + delta);
    if grid.is_floor(proposed) {
        proposed
    } else {
        current
    }
}

/// Moves one cell in a keyboard direction, through the same wall rule as
/// [`step`].
pub fn step_toward(current: Position, direction: Direction, grid: &Grid) -> Position {
    let convention = grid.convention();
    let neighbor =
        convention.from_axial(convention.to_axial(current) + direction.to_axial_delta());
    step(current, neighbor, grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CellKind, GridConvention};

    fn open_grid(convention: GridConvention) -> Grid {
        Grid::filled(10, 10, convention, CellKind::Floor)
    }

    #[test]
    fn test_step_in_place() {
        let grid = open_grid(GridConvention::Axial);
        let here = Position::new(4, 4);
        assert_eq!(step(here, here, &grid), here);
    }

    #[test]
    fn test_step_prefers_larger_axis() {
        let grid = open_grid(GridConvention::Axial);
        assert_eq!(
            step(Position::new(0, 0), Position::new(5, 0), &grid),
            Position::new(1, 0)
        );
        assert_eq!(
            step(Position::new(0, 0), Position::new(0, 5), &grid),
            Position::new(0, 1)
        );
        assert_eq!(
            step(Position::new(5, 5), Position::new(1, 3), &grid),
            Position::new(4, 5)
        );
    }

    #[test]
    fn test_step_tie_goes_to_r_axis() {
        let grid = open_grid(GridConvention::Axial);
        assert_eq!(
            step(Position::new(0, 0), Position::new(3, 3), &grid),
            Position::new(0, 1)
        );
        assert_eq!(
            step(Position::new(4, 4), Position::new(2, 2), &grid),
            Position::new(4, 3)
        );
    }

    #[test]
    fn test_wall_blocks_step() {
        let mut grid = open_grid(GridConvention::Axial);
        grid.set(Position::new(1, 0), CellKind::Wall).unwrap();
        assert_eq!(
            step(Position::new(0, 0), Position::new(1, 0), &grid),
            Position::new(0, 0)
        );
    }

    #[test]
    fn test_edge_blocks_step() {
        let grid = open_grid(GridConvention::Axial);
        assert_eq!(
            step(Position::new(0, 0), Position::new(-4, 0), &grid),
            Position::new(0, 0)
        );
    }

    #[test]
    fn test_hex_parity_steps_stay_valid() {
        let grid = open_grid(GridConvention::HexParity);
        let mut here = Position::new(0, 0);
        let target = Position::new(5, 7);
        for _ in 0..20 {
            here = step(here, target, &grid);
            assert!(grid.is_valid(here));
        }
        assert_eq!(here, target);
    }

    #[test]
    fn test_step_toward_directions() {
        let grid = open_grid(GridConvention::HexParity);
        let here = Position::new(3, 3);
        assert_eq!(step_toward(here, Direction::Up, &grid), Position::new(3, 1));
        assert_eq!(step_toward(here, Direction::Down, &grid), Position::new(3, 5));
        assert_eq!(step_toward(here, Direction::Left, &grid), Position::new(2, 2));
        assert_eq!(step_toward(here, Direction::Right, &grid), Position::new(4, 4));

        let axial = open_grid(GridConvention::Axial);
        assert_eq!(
            step_toward(Position::new(3, 3), Direction::Left, &axial),
            Position::new(2, 3)
        );
    }
}
