//! Tentrixtui: numbered falling-block puzzle in the terminal.

mod app;
mod input;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tentrixtui::SessionConfig;
use tentrixtui::config::{
    DEFAULT_COLOR_COUNT, DEFAULT_HEIGHT, DEFAULT_LOOKAHEAD, DEFAULT_MAX_NUMBER, DEFAULT_TICK_MS,
    DEFAULT_WIDTH,
};

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::for_palette(args.palette);
    let config = args.session_config();
    config.validate()?;
    let mut app = App::new(&args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Numbered falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tentrixtui",
    version,
    about = "Falling numbered-block puzzle in the terminal. Join same-coloured blocks whose numbers add up to ten.",
    long_about = "Tentrixtui is a terminal puzzle game.\n\n\
        Numbered coloured blocks fall one at a time. When a group of touching blocks of one \
        colour adds up to a multiple of ten, it disappears and the blocks above fall down. \
        Falls that complete further groups chain into combos worth bonus points.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move        Down or j  Soft drop\n  \
        Up, k or Enter     Hard drop   Space/p    Thinking pause\n  \
        r                  Restart     q / Esc    Quit"
)]
pub struct Args {
    /// Playfield width in columns.
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_name = "COLS")]
    pub width: usize,

    /// Playfield height in rows.
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_name = "ROWS")]
    pub height: usize,

    /// Highest block number (numbers are drawn from 1..=N).
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_NUMBER, value_name = "N")]
    pub max_number: u8,

    /// Number of block colours in play (1-6).
    #[arg(short, long, default_value_t = DEFAULT_COLOR_COUNT, value_name = "C")]
    pub colors: usize,

    /// Upcoming blocks shown in the preview.
    #[arg(long, default_value_t = DEFAULT_LOOKAHEAD, value_name = "K")]
    pub lookahead: usize,

    /// Milliseconds between gravity ticks.
    #[arg(short, long, default_value_t = DEFAULT_TICK_MS, value_name = "MS")]
    pub tick_ms: u64,

    /// Seed for the block generator (same seed, same blocks).
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Disable clear and combo effects.
    #[arg(long)]
    pub no_animation: bool,

    /// Colour palette: normal, high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,
}

impl Args {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            width: self.width,
            height: self.height,
            max_number: self.max_number,
            color_count: self.colors,
            lookahead: self.lookahead,
            tick_interval: Duration::from_millis(self.tick_ms),
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
