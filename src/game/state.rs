//! # Session State
//!
//! Everything one play session knows: the current map, the player, the
//! optional target and exit, and the session's random number generator.
//!
//! The game loop owns the single [`SessionState`]. Input never writes to it
//! directly; it arrives as [`SessionMessage`]s that the loop applies between
//! frames, so every field has exactly one writer.

use crate::game::{step, step_toward, Position};
use crate::generation::{utils, Dungeon, GenerationConfig, Generator, RoomCorridorGenerator};
use crate::input::SessionMessage;
use crate::{config, CrawlError, CrawlResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seed used when neither the command line nor a config file names one.
pub const DEFAULT_SEED: u64 = 42;

/// The two playable variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Axial grid, click a cell and watch the player walk there
    Offset,
    /// Hex-parity grid with an exit that leads to a new level
    Hex,
}

/// Where the player starts on a fresh map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Any floor cell
    RandomFloor,
    /// A random member of the first room
    FirstRoomMember,
    /// The midpoint member of the first room
    FirstRoomCenter,
}

/// Session configuration: map generation plus the rules of the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Variant the defaults were taken from
    pub variant: Variant,
    /// Map generation settings
    pub generation: GenerationConfig,
    /// Render frames per second
    pub fps: u32,
    /// Frames between two movement steps toward the target
    pub move_every_frames: u32,
    /// Player placement on each new map
    pub spawn: SpawnPolicy,
    /// Whether the map has an exit that leads to a new level
    pub exit: bool,
}

impl GameConfig {
    /// Creates the default configuration of a variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{GameConfig, GridConvention, Variant};
    ///
    /// let config = GameConfig::for_variant(Variant::Hex, 9);
    /// assert_eq!(config.generation.convention, GridConvention::HexParity);
    /// assert!(config.exit);
    /// ```
    pub fn for_variant(variant: Variant, seed: u64) -> Self {
        match variant {
            Variant::Offset => Self {
                variant,
                generation: GenerationConfig::for_offset_variant(seed),
                fps: config::TARGET_FPS,
                move_every_frames: config::MOVE_EVERY_FRAMES,
                spawn: SpawnPolicy::RandomFloor,
                exit: false,
            },
            Variant::Hex => Self {
                variant,
                generation: GenerationConfig::for_hex_variant(seed),
                fps: config::TARGET_FPS,
                move_every_frames: config::MOVE_EVERY_FRAMES,
                spawn: SpawnPolicy::FirstRoomMember,
                exit: true,
            },
        }
    }

    /// Parses a JSON configuration.
    ///
    /// Only the keys present in the document are overridden; everything else
    /// comes from the defaults of the document's `variant` (offset when
    /// absent). Unknown keys are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{GameConfig, Variant};
    ///
    /// let config = GameConfig::from_json(r#"{ "variant": "hex", "fps": 12 }"#).unwrap();
    /// assert_eq!(config.variant, Variant::Hex);
    /// assert_eq!(config.fps, 12);
    /// assert_eq!(config.generation.width, 100);
    /// ```
    pub fn from_json(text: &str) -> CrawlResult<Self> {
        let overrides: serde_json::Value = serde_json::from_str(text)?;
        let variant = match overrides.get("variant") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Variant::Offset,
        };

        let mut merged = serde_json::to_value(Self::for_variant(variant, DEFAULT_SEED))?;
        merge_json(&mut merged, overrides);

        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file.
    pub fn load(path: &Path) -> CrawlResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks the configuration for unusable values.
    pub fn validate(&self) -> CrawlResult<()> {
        if self.fps == 0 || self.fps > config::MAX_FPS {
            return Err(CrawlError::InvalidConfig(format!(
                "fps must be between 1 and {}",
                config::MAX_FPS
            )));
        }
        if self.move_every_frames == 0 {
            return Err(CrawlError::InvalidConfig(
                "move_every_frames must be at least 1".to_string(),
            ));
        }
        self.generation.validate()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Offset, DEFAULT_SEED)
    }
}

/// Recursively overlays `overlay` onto `base`; objects merge key by key,
/// everything else is replaced.
fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_json(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// What the loop should do after applying a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Result of one movement tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No target set
    Idle,
    /// The player already stood on the target; the target was cleared
    Arrived,
    /// The player moved; the target is cleared if this step reached it
    Moved(Position),
    /// The step was rejected by a wall or the map edge
    Blocked,
}

/// Result of one frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub movement: MoveOutcome,
    /// The player reached the exit and a new level was generated
    pub descended: bool,
}

/// Central session state.
#[derive(Debug, Clone)]
pub struct SessionState {
    config: GameConfig,
    dungeon: Dungeon,
    player: Position,
    target: Option<Position>,
    exit: Option<Position>,
    depth: u32,
    level_seed: u64,
    frame: u64,
    rng: StdRng,
}

impl SessionState {
    /// Starts a session: generates the first level and places the player
    /// (and the exit when the variant has one).
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{GameConfig, SessionState, Variant};
    ///
    /// let session = SessionState::new(GameConfig::for_variant(Variant::Offset, 1)).unwrap();
    /// assert!(session.grid().is_floor(session.player()));
    /// assert_eq!(session.target(), None);
    /// ```
    pub fn new(config: GameConfig) -> CrawlResult<Self> {
        config.validate()?;
        let mut rng = utils::create_rng(&config.generation);
        let dungeon = RoomCorridorGenerator::new().generate(&config.generation, &mut rng)?;
        let level_seed = config.generation.seed;
        Self::start(config, dungeon, level_seed, rng)
    }

    /// Starts a session on an existing map, continuing with `rng`.
    pub fn with_dungeon(config: GameConfig, dungeon: Dungeon, rng: StdRng) -> CrawlResult<Self> {
        config.validate()?;
        let level_seed = config.generation.seed;
        Self::start(config, dungeon, level_seed, rng)
    }

    fn start(
        config: GameConfig,
        dungeon: Dungeon,
        level_seed: u64,
        mut rng: StdRng,
    ) -> CrawlResult<Self> {
        let player = spawn_position(&dungeon, config.spawn, &mut rng)?;
        let exit = if config.exit {
            Some(exit_position(&dungeon, player, &mut rng)?)
        } else {
            None
        };

        info!(
            "Session started on a {}x{} map (seed {}), player at ({}, {})",
            dungeon.grid.width(),
            dungeon.grid.height(),
            level_seed,
            player.x,
            player.y
        );

        Ok(Self {
            config,
            dungeon,
            player,
            target: None,
            exit,
            depth: 0,
            level_seed,
            frame: 0,
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn grid(&self) -> &crate::game::Grid {
        &self.dungeon.grid
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn target(&self) -> Option<Position> {
        self.target
    }

    pub fn exit(&self) -> Option<Position> {
        self.exit
    }

    /// Number of levels descended so far.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Seed the current level was generated from.
    pub fn level_seed(&self) -> u64 {
        self.level_seed
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Applies one input message.
    ///
    /// Targets outside the map are ignored; a keyboard step moves at once
    /// and drops any pending target.
    pub fn apply(&mut self, message: SessionMessage) -> Control {
        match message {
            SessionMessage::TargetSelected(pos) => {
                if self.dungeon.grid.is_valid(pos) {
                    self.target = Some(pos);
                } else {
                    debug!("Ignoring target outside the map at ({}, {})", pos.x, pos.y);
                }
                Control::Continue
            }
            SessionMessage::Step(direction) => {
                self.player = step_toward(self.player, direction, &self.dungeon.grid);
                self.target = None;
                Control::Continue
            }
            SessionMessage::Quit => Control::Quit,
        }
    }

    /// Advances one frame: moves every `move_every_frames` frames, then
    /// descends if the player stands on the exit.
    pub fn tick(&mut self) -> CrawlResult<TickOutcome> {
        self.frame += 1;

        let movement = if self.frame % u64::from(self.config.move_every_frames) == 0 {
            self.advance_movement()
        } else {
            MoveOutcome::Idle
        };

        let descended = self.exit == Some(self.player);
        if descended {
            self.descend()?;
        }

        Ok(TickOutcome {
            movement,
            descended,
        })
    }

    /// Takes one greedy step toward the target, if any.
    pub fn advance_movement(&mut self) -> MoveOutcome {
        let Some(target) = self.target else {
            return MoveOutcome::Idle;
        };

        if self.player == target {
            self.target = None;
            return MoveOutcome::Arrived;
        }

        let next = step(self.player, target, &self.dungeon.grid);
        if next == self.player {
            return MoveOutcome::Blocked;
        }

        self.player = next;
        if next == target {
            self.target = None;
        }
        MoveOutcome::Moved(next)
    }

    /// Replaces the level with a fresh one one step deeper.
    pub fn descend(&mut self) -> CrawlResult<()> {
        let level_seed: u64 = self.rng.gen();
        let generation = GenerationConfig {
            seed: level_seed,
            ..self.config.generation.clone()
        };
        let mut level_rng = utils::create_rng(&generation);
        let dungeon = RoomCorridorGenerator::new().generate(&generation, &mut level_rng)?;

        let player = spawn_position(&dungeon, self.config.spawn, &mut self.rng)?;
        let exit = if self.config.exit {
            Some(exit_position(&dungeon, player, &mut self.rng)?)
        } else {
            None
        };

        self.dungeon = dungeon;
        self.player = player;
        self.exit = exit;
        self.target = None;
        self.depth += 1;
        self.level_seed = level_seed;

        info!("Descended to depth {} (seed {})", self.depth, level_seed);
        Ok(())
    }
}

/// Picks the player's starting cell on a fresh map.
pub fn spawn_position<R: Rng + ?Sized>(
    dungeon: &Dungeon,
    policy: SpawnPolicy,
    rng: &mut R,
) -> CrawlResult<Position> {
    let first_room = dungeon.rooms.first();
    let candidate = match policy {
        SpawnPolicy::RandomFloor => return dungeon.grid.random_floor(rng),
        SpawnPolicy::FirstRoomMember => first_room.and_then(|room| room.random_member(rng)),
        SpawnPolicy::FirstRoomCenter => first_room.and_then(|room| room.midpoint()),
    };

    candidate
        .filter(|&pos| dungeon.grid.is_floor(pos))
        .ok_or(CrawlError::NoReachableFloor)
}

/// Picks an exit among the room members other than the player's cell.
pub fn exit_position<R: Rng + ?Sized>(
    dungeon: &Dungeon,
    player: Position,
    rng: &mut R,
) -> CrawlResult<Position> {
    let candidates: Vec<Position> = dungeon
        .rooms
        .iter()
        .flat_map(|room| room.members.iter().copied())
        .filter(|&pos| pos != player && dungeon.grid.is_floor(pos))
        .collect();

    candidates
        .choose(rng)
        .copied()
        .ok_or(CrawlError::NoReachableFloor)
}
