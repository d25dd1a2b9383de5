//! # Delve Main Entry Point
//!
//! Parses the command line, builds the game state and runs a line-based game
//! loop on stdin/stdout.

use clap::Parser;
use delve::{
    read_level_files, DelveResult, GameConfig, GameState, InputHandler, PlayerInput, TextDisplay,
    HELP_TEXT,
};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "A deterministic turn-based dungeon crawler")]
#[command(version)]
struct Args {
    /// Random seed for the whole game
    #[arg(short, long)]
    seed: Option<u64>,

    /// Width of generated floors in tiles
    #[arg(long)]
    width: Option<u32>,

    /// Height of generated floors in tiles
    #[arg(long)]
    height: Option<u32>,

    /// Number of generated floors
    #[arg(long)]
    max_depth: Option<u32>,

    /// JSON game configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Level description files, played in order instead of generated floors
    #[arg(short, long = "level")]
    levels: Vec<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting Delve v{}", delve::VERSION);

    let config = build_config(&args)?;
    let game_state = if args.levels.is_empty() {
        info!("Generating a {}-level dungeon with seed {}", config.max_depth, config.seed);
        GameState::new(config)?
    } else {
        info!("Loading {} level files", args.levels.len());
        let texts = read_level_files(&args.levels)?;
        GameState::from_descriptions(config, texts)?
    };

    run_game_loop(game_state, &InputHandler::new())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .init();
    }
}

/// Merges the configuration file with command line overrides.
fn build_config(args: &Args) -> DelveResult<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => GameConfig::new(12345),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.generation.width = width;
    }
    if let Some(height) = args.height {
        config.generation.height = height;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    Ok(config)
}

/// Main game loop: draw a frame, read a command, run a turn.
fn run_game_loop(mut game_state: GameState, input_handler: &InputHandler) -> DelveResult<()> {
    let mut display = TextDisplay::new();
    display.record_turn(&game_state);
    display.add_message("Type ? for help.".to_string());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        writeln!(stdout, "\n{}", display.render(&game_state))?;
        if game_state.is_game_ended() {
            break;
        }
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match input_handler.parse(&line) {
            None => display.add_message("Unknown command. Type ? for help.".to_string()),
            Some(PlayerInput::Quit) => {
                info!("Player quit the game");
                break;
            }
            Some(PlayerInput::Help) => writeln!(stdout, "{}", HELP_TEXT)?,
            Some(PlayerInput::ShowInventory) => {
                display.show_inventory = !display.show_inventory;
            }
            Some(input) => {
                if let Some(action) = input_handler.input_to_action(input, &game_state) {
                    game_state.perform(action);
                    display.record_turn(&game_state);
                }
            }
        }
    }

    info!(
        "Game loop ended after {} turns: {:?}",
        game_state.turn_number(),
        game_state.completion_state()
    );
    Ok(())
}
