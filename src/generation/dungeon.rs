//! # Dungeon Generation
//!
//! Room-and-corridor map generation.
//!
//! The generator:
//! 1. Fills the grid with walls
//! 2. Places randomly sized rooms anywhere they fit (overlap is allowed)
//! 3. Joins each room to the next with an L-shaped corridor
//! 4. Optionally flood-fills the result to prove every room is reachable

use crate::game::{Grid, GridConvention, Position};
use crate::generation::{utils, Dungeon, GenerationConfig, Generator, Room};
use crate::{CrawlError, CrawlResult};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Primary map generator using the room-and-corridor algorithm.
#[derive(Debug, Clone, Default)]
pub struct RoomCorridorGenerator;

impl RoomCorridorGenerator {
    /// Creates a new map generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{utils, GenerationConfig, Generator, RoomCorridorGenerator};
    ///
    /// let generator = RoomCorridorGenerator::new();
    /// let config = GenerationConfig::for_testing(5);
    /// let mut rng = utils::create_rng(&config);
    /// let dungeon = generator.generate(&config, &mut rng).unwrap();
    /// assert!(dungeon.grid.floor_count() > 0);
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Largest room side that still leaves room for an anchor, or
    /// `InvalidDimensions` when not even the smallest room fits.
    fn usable_max_room_size(&self, config: &GenerationConfig) -> CrawlResult<u32> {
        let fit = config.width.min(config.height).saturating_sub(1);
        let max = config.max_room_size.min(fit);
        if max < config.min_room_size {
            return Err(CrawlError::InvalidDimensions {
                width: config.width,
                height: config.height,
                min_room_size: config.min_room_size,
            });
        }
        Ok(max)
    }

    /// Places rooms and carves them into the grid.
    fn place_rooms(
        &self,
        grid: &mut Grid,
        config: &GenerationConfig,
        max_room_size: u32,
        rng: &mut StdRng,
    ) -> Vec<Room> {
        let room_count = rng.gen_range(config.min_rooms..=config.max_rooms);
        let mut rooms = Vec::with_capacity(room_count as usize);

        for room_id in 0..room_count {
            let room = self.generate_room(grid, config, max_room_size, rng, room_id);
            self.carve_room(grid, &room);
            rooms.push(room);
        }

        rooms
    }

    /// Draws a room's size and anchor.
    fn generate_room(
        &self,
        grid: &Grid,
        config: &GenerationConfig,
        max_room_size: u32,
        rng: &mut StdRng,
        room_id: u32,
    ) -> Room {
        let width = rng.gen_range(config.min_room_size..=max_room_size);
        let height = if config.square_rooms {
            width
        } else {
            rng.gen_range(config.min_room_size..=max_room_size)
        };

        let x = self.anchor(grid.width(), width, grid.convention(), rng);
        let y = self.anchor(grid.height(), height, grid.convention(), rng);

        Room::new(room_id, Position::new(x, y), width, height, grid.convention())
    }

    /// Chooses one of the `extent - side` anchors that keep the room inside.
    ///
    /// The hex layout keeps a one-cell margin on the top and left edges.
    fn anchor(&self, extent: u32, side: u32, convention: GridConvention, rng: &mut StdRng) -> i32 {
        let margin = match convention {
            GridConvention::Axial => 0,
            GridConvention::HexParity => 1,
        };
        margin + rng.gen_range(0..(extent - side) as i32)
    }

    /// Carves a room in the grid by setting its members to floor.
    fn carve_room(&self, grid: &mut Grid, room: &Room) {
        for &pos in &room.members {
            grid.carve(pos);
        }
    }

    /// Joins each room to the next one with an L-shaped corridor.
    fn connect_rooms(
        &self,
        grid: &mut Grid,
        rooms: &[Room],
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) {
        for pair in rooms.windows(2) {
            let start = pair[0].connector(config.connector, rng);
            let end = pair[1].connector(config.connector, rng);
            if let (Some(start), Some(end)) = (start, end) {
                self.carve_l_corridor(grid, start, end, config.corridor_width);
            }
        }
    }

    /// Carves an L-shaped corridor: along the start row to the end column,
    /// then along the end column to the end row.
    ///
    /// Each span carves `lanes` parallel lines. Extra lanes sit on the side
    /// facing the other endpoint, and flip over when that side is off the
    /// grid, so hex-parity corridors always keep their zigzag.
    pub fn carve_l_corridor(&self, grid: &mut Grid, start: Position, end: Position, lanes: u32) {
        let row_side = lane_side(start.y, end.y, grid.height());
        let column_side = lane_side(end.x, start.x, grid.width());

        for lane in 0..lanes as i32 {
            let y = start.y + lane * row_side;
            for x in start.x.min(end.x)..=start.x.max(end.x) {
                grid.carve(Position::new(x, y));
            }
        }

        for lane in 0..lanes as i32 {
            let x = end.x + lane * column_side;
            for y in start.y.min(end.y)..=start.y.max(end.y) {
                grid.carve(Position::new(x, y));
            }
        }
    }
}

/// Direction in which extra lanes are stacked next to the line at `line`:
/// toward `facing`, or away from it when that side is off the grid.
fn lane_side(line: i32, facing: i32, extent: u32) -> i32 {
    let side = if facing < line { -1 } else { 1 };
    let neighbor = line + side;
    if neighbor < 0 || neighbor >= extent as i32 {
        -side
    } else {
        side
    }
}

impl Generator<Dungeon> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CrawlResult<Dungeon> {
        config.validate()?;
        let max_room_size = self.usable_max_room_size(config)?;

        // Create empty grid (all walls)
        let mut grid = Grid::new(config.width, config.height, config.convention);

        let rooms = self.place_rooms(&mut grid, config, max_room_size, rng);
        self.connect_rooms(&mut grid, &rooms, config, rng);

        debug!(
            "{} built {}x{} {:?} grid with {} rooms and {} floor cells",
            self.generator_type(),
            config.width,
            config.height,
            config.convention,
            rooms.len(),
            grid.floor_count()
        );

        let dungeon = Dungeon { grid, rooms };
        self.validate(&dungeon, config)?;
        Ok(dungeon)
    }

    fn validate(&self, dungeon: &Dungeon, config: &GenerationConfig) -> CrawlResult<()> {
        utils::validate_grid(&dungeon.grid)?;
        if config.ensure_connectivity {
            utils::validate_connectivity(dungeon)?;
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CellKind;

    #[test]
    fn test_generation_with_small_level() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(12345);
        let mut rng = utils::create_rng(&config);

        let dungeon = generator.generate(&config, &mut rng).unwrap();
        assert_eq!(dungeon.grid.width(), config.width);
        assert_eq!(dungeon.grid.height(), config.height);
        assert!(dungeon.rooms.len() >= config.min_rooms as usize);
        assert!(dungeon.rooms.len() <= config.max_rooms as usize);
        assert!(dungeon.grid.floor_count() > 0);
    }

    #[test]
    fn test_rooms_fit_and_are_floor() {
        let generator = RoomCorridorGenerator::new();
        for seed in 0..20 {
            let config = GenerationConfig::for_offset_variant(seed);
            let mut rng = utils::create_rng(&config);
            let dungeon = generator.generate(&config, &mut rng).unwrap();
            for room in &dungeon.rooms {
                assert!(dungeon.grid.is_valid(room.top_left));
                assert!(dungeon.grid.is_valid(room.bottom_right()));
                assert!(room.width >= config.min_room_size && room.width <= config.max_room_size);
                assert!(room.members.iter().all(|&pos| dungeon.grid.is_floor(pos)));
            }
        }
    }

    #[test]
    fn test_hex_rooms_are_square_with_margin() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_hex_variant(77);
        let mut rng = utils::create_rng(&config);
        let dungeon = generator.generate(&config, &mut rng).unwrap();
        for room in &dungeon.rooms {
            assert_eq!(room.width, room.height);
            assert!(room.top_left.x >= 1 && room.top_left.y >= 1);
        }
    }

    #[test]
    fn test_too_small_grid_fails_fast() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_offset_variant(1).with_dimensions(3, 30);
        let mut rng = utils::create_rng(&config);
        assert!(matches!(
            generator.generate(&config, &mut rng),
            Err(CrawlError::InvalidDimensions { width: 3, height: 30, .. })
        ));
    }

    #[test]
    fn test_room_size_clamped_to_grid() {
        let generator = RoomCorridorGenerator::new();
        // Rooms up to 7 requested, but only sides up to 4 fit.
        let config = GenerationConfig::for_offset_variant(3).with_dimensions(5, 5);
        let mut rng = utils::create_rng(&config);
        let dungeon = generator.generate(&config, &mut rng).unwrap();
        assert!(dungeon.rooms.iter().all(|room| room.width <= 4 && room.height <= 4));
    }

    #[test]
    fn test_l_corridor_carving() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = Grid::new(20, 20, GridConvention::Axial);

        let start = Position::new(5, 5);
        let end = Position::new(15, 15);
        generator.carve_l_corridor(&mut grid, start, end, 1);

        assert_eq!(grid.get(start), Some(CellKind::Floor));
        assert_eq!(grid.get(end), Some(CellKind::Floor));
        assert_eq!(grid.get(Position::new(15, 5)), Some(CellKind::Floor));
        assert_eq!(grid.get(Position::new(5, 15)), Some(CellKind::Wall));
        assert_eq!(grid.floor_count(), 21);
    }

    #[test]
    fn test_wide_corridor_lanes_face_the_target() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = Grid::new(10, 10, GridConvention::Axial);
        generator.carve_l_corridor(&mut grid, Position::new(6, 6), Position::new(2, 2), 2);

        // Horizontal lanes at rows 6 and 5, vertical lanes at columns 2 and 3.
        assert!(grid.is_floor(Position::new(4, 5)));
        assert!(!grid.is_floor(Position::new(4, 7)));
        assert!(grid.is_floor(Position::new(3, 4)));
        assert!(!grid.is_floor(Position::new(1, 4)));
    }

    #[test]
    fn test_corridor_lane_flips_at_edge() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = Grid::new(10, 10, GridConvention::HexParity);
        generator.carve_l_corridor(&mut grid, Position::new(1, 9), Position::new(7, 9), 2);

        // The second lane lands on row 8 because row 10 is off the grid.
        assert!(grid.is_floor(Position::new(2, 8)));
        let dungeon_floor = grid.floor_positions();
        let reachable = utils::reachable_floor(&grid, Position::new(1, 9));
        assert_eq!(reachable.len(), dungeon_floor.len());
    }

    #[test]
    fn test_carving_twice_is_idempotent() {
        let generator = RoomCorridorGenerator::new();
        let mut grid = Grid::new(12, 12, GridConvention::Axial);
        generator.carve_l_corridor(&mut grid, Position::new(1, 1), Position::new(9, 8), 2);
        let once = grid.clone();
        generator.carve_l_corridor(&mut grid, Position::new(1, 1), Position::new(9, 8), 2);
        assert_eq!(grid, once);
    }

    #[test]
    fn test_same_seed_same_map() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_hex_variant(2024);
        let first = generator
            .generate(&config, &mut utils::create_rng(&config))
            .unwrap();
        let second = generator
            .generate(&config, &mut utils::create_rng(&config))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_validation() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(12345);

        let mut grid = Grid::new(10, 10, GridConvention::Axial);
        grid.set(Position::new(5, 5), CellKind::Floor).unwrap();
        let dungeon = Dungeon {
            grid,
            rooms: Vec::new(),
        };
        assert!(generator.validate(&dungeon, &config).is_ok());

        let empty = Dungeon {
            grid: Grid::new(10, 10, GridConvention::Axial),
            rooms: Vec::new(),
        };
        assert!(generator.validate(&empty, &config).is_err());
    }
}
