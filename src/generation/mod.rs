//! # Generation Module
//!
//! Procedural map generation: randomized rectangular rooms joined by
//! L-shaped corridors.
//!
//! The configuration decides the coordinate convention, room ranges,
//! corridor width and how corridor endpoints are picked from each room. The
//! presets reproduce the two playable variants.

pub mod dungeon;

pub use dungeon::*;

use crate::game::{Grid, GridConvention, Position};
use crate::{config, CrawlError, CrawlResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How a corridor endpoint is picked from a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorPolicy {
    /// The middle entry of the room's member list
    Midpoint,
    /// A uniformly random member
    RandomMember,
}

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Coordinate convention of the generated grid
    pub convention: GridConvention,
    /// Minimum number of rooms per level
    pub min_rooms: u32,
    /// Maximum number of rooms per level
    pub max_rooms: u32,
    /// Minimum room side
    pub min_room_size: u32,
    /// Maximum room side
    pub max_room_size: u32,
    /// Draw one side length for both axes
    pub square_rooms: bool,
    /// Number of parallel lanes carved for each corridor span
    pub corridor_width: u32,
    /// Corridor endpoint choice
    pub connector: ConnectorPolicy,
    /// Flood-fill the result and fail if a room is cut off
    pub ensure_connectivity: bool,
}

impl GenerationConfig {
    /// Creates the configuration of the offset variant: a small axial grid
    /// with double-width corridors between room midpoints.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{GenerationConfig, GridConvention};
    ///
    /// let config = GenerationConfig::for_offset_variant(7);
    /// assert_eq!(config.convention, GridConvention::Axial);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn for_offset_variant(seed: u64) -> Self {
        Self {
            seed,
            width: config::OFFSET_MAP_WIDTH,
            height: config::OFFSET_MAP_HEIGHT,
            convention: GridConvention::Axial,
            min_rooms: 3,
            max_rooms: 7,
            min_room_size: 3,
            max_room_size: 7,
            square_rooms: false,
            corridor_width: 2,
            connector: ConnectorPolicy::Midpoint,
            ensure_connectivity: true,
        }
    }

    /// Creates the configuration of the hex variant: a wide hex-parity grid
    /// with square rooms joined at random members.
    pub fn for_hex_variant(seed: u64) -> Self {
        Self {
            seed,
            width: config::HEX_MAP_WIDTH,
            height: config::HEX_MAP_HEIGHT,
            convention: GridConvention::HexParity,
            min_rooms: 5,
            max_rooms: 14,
            min_room_size: 5,
            max_room_size: 10,
            square_rooms: true,
            corridor_width: 2,
            connector: ConnectorPolicy::RandomMember,
            ensure_connectivity: true,
        }
    }

    /// Creates a configuration for testing with small, quick levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 16,
            height: 12,
            convention: GridConvention::Axial,
            min_rooms: 2,
            max_rooms: 4,
            min_room_size: 2,
            max_room_size: 4,
            square_rooms: false,
            corridor_width: 1,
            connector: ConnectorPolicy::Midpoint,
            ensure_connectivity: true,
        }
    }

    /// Overrides the grid size.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Checks the configuration for inconsistent ranges.
    ///
    /// Dimensions are checked separately by the generator, since whether a
    /// room fits depends on both the grid and the room ranges.
    pub fn validate(&self) -> CrawlResult<()> {
        if self.min_rooms == 0 || self.min_rooms > self.max_rooms {
            return Err(CrawlError::InvalidConfig(format!(
                "room count range {}..={} is empty",
                self.min_rooms, self.max_rooms
            )));
        }
        if self.min_room_size == 0 || self.min_room_size > self.max_room_size {
            return Err(CrawlError::InvalidConfig(format!(
                "room size range {}..={} is empty",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.corridor_width == 0 {
            return Err(CrawlError::InvalidConfig(
                "corridor width must be at least 1".to_string(),
            ));
        }
        if self.convention == GridConvention::HexParity {
            // A single parity lane or a one-cell room is a chain of
            // unconnected hexes.
            if self.corridor_width < 2 {
                return Err(CrawlError::InvalidConfig(
                    "hex-parity corridors need a width of at least 2".to_string(),
                ));
            }
            if self.min_room_size < 2 {
                return Err(CrawlError::InvalidConfig(
                    "hex-parity rooms need a side of at least 2".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::for_offset_variant(42)
    }
}

/// A rectangular room placed during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Index of the room in generation order
    pub id: u32,
    /// Top-left corner of the rectangle
    pub top_left: Position,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
    /// Valid cells of the rectangle, column by column
    pub members: Vec<Position>,
}

impl Room {
    /// Creates a room covering every valid cell of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{GridConvention, Position, Room};
    ///
    /// let room = Room::new(0, Position::new(1, 1), 3, 2, GridConvention::Axial);
    /// assert_eq!(room.members.len(), 6);
    /// assert_eq!(room.midpoint(), Some(Position::new(2, 2)));
    /// ```
    pub fn new(
        id: u32,
        top_left: Position,
        width: u32,
        height: u32,
        convention: GridConvention,
    ) -> Self {
        let mut members = Vec::with_capacity((width * height) as usize);
        for x in top_left.x..top_left.x + width as i32 {
            for y in top_left.y..top_left.y + height as i32 {
                let pos = Position::new(x, y);
                if convention.has_valid_parity(pos) {
                    members.push(pos);
                }
            }
        }

        Self {
            id,
            top_left,
            width,
            height,
            members,
        }
    }

    /// Gets the bottom-right corner of the rectangle.
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 - 1,
            self.top_left.y + self.height as i32 - 1,
        )
    }

    /// Checks if a position is inside the rectangle.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x < self.top_left.x + self.width as i32
            && pos.y < self.top_left.y + self.height as i32
    }

    /// Gets the middle entry of the member list.
    pub fn midpoint(&self) -> Option<Position> {
        self.members.get(self.members.len() / 2).copied()
    }

    /// Picks a uniformly random member.
    pub fn random_member<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        self.members.choose(rng).copied()
    }

    /// Picks a corridor endpoint according to `policy`.
    pub fn connector<R: Rng + ?Sized>(
        &self,
        policy: ConnectorPolicy,
        rng: &mut R,
    ) -> Option<Position> {
        match policy {
            ConnectorPolicy::Midpoint => self.midpoint(),
            ConnectorPolicy::RandomMember => self.random_member(rng),
        }
    }
}

/// A generated map with the rooms it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    pub grid: Grid,
    /// Rooms in generation order; consecutive rooms are joined by a corridor
    pub rooms: Vec<Room>,
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CrawlResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> CrawlResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Generates an offset-variant map of the given size.
///
/// Without a seed the generator draws one from entropy.
///
/// # Examples
///
/// ```
/// use hexcrawl::generate_map;
///
/// let dungeon = generate_map(20, 20, Some(3)).unwrap();
/// assert_eq!(dungeon.grid.width(), 20);
/// assert!(!dungeon.rooms.is_empty());
///
/// assert!(generate_map(3, 3, Some(3)).is_err());
/// ```
pub fn generate_map(width: u32, height: u32, seed: Option<u64>) -> CrawlResult<Dungeon> {
    let seed = seed.unwrap_or_else(rand::random);
    let config = GenerationConfig::for_offset_variant(seed).with_dimensions(width, height);
    let mut rng = utils::create_rng(&config);
    RoomCorridorGenerator::new().generate(&config, &mut rng)
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use pathfinding::prelude::bfs_reach;
    use std::collections::HashSet;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Collects every floor cell reachable from `start` through floor
    /// neighbors of the grid's convention.
    pub fn reachable_floor(grid: &Grid, start: Position) -> HashSet<Position> {
        if !grid.is_floor(start) {
            return HashSet::new();
        }
        bfs_reach(start, |&pos| grid.floor_neighbors(pos)).collect()
    }

    /// Checks that every room member is reachable from the first room.
    pub fn validate_connectivity(dungeon: &Dungeon) -> CrawlResult<()> {
        let Some(start) = dungeon.rooms.first().and_then(|room| room.members.first()) else {
            return Ok(());
        };

        let reachable = reachable_floor(&dungeon.grid, *start);
        for room in &dungeon.rooms {
            if let Some(cut_off) = room.members.iter().find(|pos| !reachable.contains(*pos)) {
                return Err(CrawlError::GenerationFailed(format!(
                    "room {} is not connected at ({}, {})",
                    room.id, cut_off.x, cut_off.y
                )));
            }
        }

        Ok(())
    }

    /// Validates that a map has floor to stand on.
    pub fn validate_grid(grid: &Grid) -> CrawlResult<()> {
        if grid.floor_count() == 0 {
            return Err(CrawlError::GenerationFailed(
                "grid has no floor cells".to_string(),
            ));
        }
        Ok(())
    }
}
