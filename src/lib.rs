//! # Hexcrawl
//!
//! A small terminal dungeon crawler played on one of two hexagonal grids.
//!
//! ## Architecture Overview
//!
//! - **Coordinates**: two addressing conventions (axial and hex-parity) that
//!   generation, movement, input and rendering all share
//! - **Generation**: room-and-corridor map generation with configurable room
//!   ranges, corridor width and connector policy
//! - **Movement**: a greedy single-step resolver toward a target cell
//! - **Session**: the explicit state owned by the game loop
//! - **Input**: a background reader that turns terminal events into session
//!   messages sent over a channel
//! - **Rendering**: a render-surface abstraction with a crossterm terminal
//!   backend and an in-memory frame buffer

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;

/// Core error type for the crawler.
#[derive(thiserror::Error, Debug)]
pub enum CrawlError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The grid cannot hold even the smallest room
    #[error("Invalid dimensions: {width}x{height} grid cannot fit a room of side {min_room_size}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        min_room_size: u32,
    },

    /// A floor cell was requested but the grid has none to offer
    #[error("No reachable floor cell")]
    NoReachableFloor,

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Position is outside the grid or not addressable in its convention
    #[error("Position out of bounds: ({}, {})", .0.x, .0.y)]
    OutOfBounds(Position),

    /// Generation produced an unusable map
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The input task panicked or was cancelled
    #[error("Input reader failed: {0}")]
    Input(String),
}

/// Result type used throughout the crawler.
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Grid width of the offset variant
    pub const OFFSET_MAP_WIDTH: u32 = 20;

    /// Grid height of the offset variant
    pub const OFFSET_MAP_HEIGHT: u32 = 20;

    /// Grid width of the hex variant
    pub const HEX_MAP_WIDTH: u32 = 100;

    /// Grid height of the hex variant
    pub const HEX_MAP_HEIGHT: u32 = 40;

    /// Render frames per second
    pub const TARGET_FPS: u32 = 8;

    /// Highest frame rate the frame clock can pace
    pub const MAX_FPS: u32 = 1000;

    /// Frames between two movement steps
    pub const MOVE_EVERY_FRAMES: u32 = 1;

    /// Input poll timeout in milliseconds; bounds how long a stop request waits
    pub const INPUT_POLL_MS: u64 = 50;
}
