//! # Hexcrawl Main Entry Point
//!
//! Parses the command line, builds the session and runs the paced game loop
//! in the terminal.

use clap::Parser;
use hexcrawl::{
    config, Control, CrawlResult, CrosstermEvents, GameConfig, InputHandler, InputReader,
    MapView, SessionMessage, SessionState, TerminalDisplay, Variant,
};
use log::{error, info};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};
use tokio::time::MissedTickBehavior;

/// Command line arguments for hexcrawl.
#[derive(Parser, Debug)]
#[command(name = "hexcrawl")]
#[command(about = "A terminal dungeon crawl on axial and hex-parity grids")]
#[command(version)]
struct Args {
    /// Map variant
    #[arg(long, value_enum, conflicts_with = "config")]
    variant: Option<Variant>,

    /// Random seed for map generation (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Map width in cells
    #[arg(long)]
    width: Option<u32>,

    /// Map height in cells
    #[arg(long)]
    height: Option<u32>,

    /// JSON configuration file; other flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Frames between two steps toward a clicked target
    #[arg(long)]
    move_every: Option<u32>,

    /// Log file; without one logging is off while the terminal is in use
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> CrawlResult<()> {
    let args = Args::parse();

    initialize_logging(&args)?;
    info!("Starting hexcrawl v{}", hexcrawl::VERSION);

    let game_config = build_config(&args)?;
    info!(
        "Variant {:?}, {}x{} map, seed {}",
        game_config.variant,
        game_config.generation.width,
        game_config.generation.height,
        game_config.generation.seed
    );
    let session = SessionState::new(game_config)?;

    let mut display = TerminalDisplay::new();
    display.enter()?;

    let (reader, messages) = InputReader::spawn(
        CrosstermEvents,
        InputHandler::for_grid(session.grid()),
        Duration::from_millis(config::INPUT_POLL_MS),
    );

    let result = run_game(session, &mut display, messages).await;
    let stopped = reader.stop().await;

    // Early returns and panics restore the terminal when `display` drops.
    let restored = display.exit();

    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }
    result?;
    stopped?;
    restored
}

/// Sends logs to the log file, if one was given.
fn initialize_logging(args: &Args) -> CrawlResult<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = std::fs::File::create(path)?;
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Combines the config file (or the variant preset) with command-line
/// overrides.
fn build_config(args: &Args) -> CrawlResult<GameConfig> {
    let mut game_config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::for_variant(args.variant.unwrap_or(Variant::Offset), rand::random()),
    };

    if let Some(seed) = args.seed {
        game_config.generation.seed = seed;
    }
    if let Some(width) = args.width {
        game_config.generation.width = width;
    }
    if let Some(height) = args.height {
        game_config.generation.height = height;
    }
    if let Some(fps) = args.fps {
        game_config.fps = fps;
    }
    if let Some(move_every) = args.move_every {
        game_config.move_every_frames = move_every;
    }

    game_config.validate()?;
    Ok(game_config)
}

/// Runs frames until a quit message arrives or input closes.
async fn run_game(
    mut session: SessionState,
    display: &mut TerminalDisplay,
    mut messages: UnboundedReceiver<SessionMessage>,
) -> CrawlResult<()> {
    let view = MapView::new();
    let mut frames = tokio::time::interval(Duration::from_secs(1) / session.config().fps);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        frames.tick().await;

        loop {
            match messages.try_recv() {
                Ok(message) => {
                    if session.apply(message) == Control::Quit {
                        info!("Quit requested after {} frames", session.frame());
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("Input closed, ending session");
                    return Ok(());
                }
            }
        }

        session.tick()?;
        view.render(&session, display)?;
    }
}
