//! Command-line interface for tui-tiles.

use std::path::PathBuf;

use clap::Parser;

use tui_tiles::types::InputMode;

/// Tile-swap picture puzzle for the terminal
#[derive(Parser, Debug)]
#[command(name = "tui-tiles")]
#[command(about = "Swap tiles back into place to restore the picture", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Campaign JSON file (built-in six-level campaign if omitted)
    #[arg(long)]
    pub campaign: Option<PathBuf>,

    /// Level number to start from
    #[arg(long, default_value_t = 1)]
    pub level: u32,

    /// Shuffle seed, for reproducible boards
    #[arg(long)]
    pub seed: Option<u32>,

    /// Starting input mode: drag or select
    #[arg(long, default_value = "drag", value_parser = parse_mode)]
    pub mode: InputMode,

    /// Log file; the terminal itself is taken by the game
    #[arg(long, default_value = "tui-tiles.log")]
    pub log_file: PathBuf,
}

fn parse_mode(s: &str) -> Result<InputMode, String> {
    InputMode::from_str(s).ok_or_else(|| format!("unknown mode '{s}' (expected drag or select)"))
}
