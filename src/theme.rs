//! Built-in colour palettes: block colours plus UI colours.

use ratatui::style::Color;
use tentrixtui::BlockColor;

/// `0xRRGGBB` → ratatui Color.
const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Block and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Block colours, indexed by [`BlockColor::index`]: red, green, blue, yellow, magenta, cyan.
    pub blocks: [Color; 6],
    /// Number text drawn on blocks.
    pub number_fg: Color,
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, chain).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text (key help).
    pub inactive_fg: Color,
    /// "Combo xN!" banner.
    pub combo: Color,
    /// "Thinking..." overlay.
    pub thinking: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_palette(crate::Palette::Normal)
    }
}

impl Theme {
    /// Dark primaries for the first three colours on a One Dark UI.
    fn base() -> Self {
        Self {
            blocks: [
                rgb(0xCC3333), // dark red
                rgb(0x33CC33), // dark green
                rgb(0x3333CC), // dark blue
                rgb(0xE5C07B), // yellow
                rgb(0xC678DD), // magenta
                rgb(0x56B6C2), // cyan
            ],
            number_fg: rgb(0xFFFFFF),
            bg: rgb(0x31353F),
            div_line: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
            combo: rgb(0xFFCC00),
            thinking: rgb(0x00CCFF),
        }
    }

    pub fn for_palette(palette: crate::Palette) -> Self {
        let mut theme = Self::base();
        theme.apply_palette(palette);
        theme
    }

    /// Override block colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                // Saturated colours on the dark bg
                self.blocks = [
                    rgb(0xFF0000),
                    rgb(0x00FF00),
                    rgb(0x0088FF),
                    rgb(0xFFFF00),
                    rgb(0xFF00FF),
                    rgb(0x00FFFF),
                ];
                self.number_fg = Color::Black;
            }
            crate::Palette::Colorblind => {
                // Avoid relying on red vs green
                self.blocks = [
                    rgb(0xCC3311), // red
                    rgb(0x009988), // teal
                    rgb(0x0077BB), // blue
                    rgb(0xEE7733), // orange
                    rgb(0xEE3377), // magenta
                    rgb(0xBBBB00), // yellow
                ];
            }
        }
    }

    #[inline]
    pub fn block_color(&self, color: BlockColor) -> Color {
        self.blocks[color.index()]
    }
}

/// Scale an RGB colour; named colours are approximated first.
pub fn shade(color: Color, factor: f32) -> Color {
    let (r, g, b) = match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Red => (255, 0, 0),
        Color::Green => (0, 255, 0),
        Color::Yellow => (255, 255, 0),
        Color::Blue => (0, 0, 255),
        Color::Magenta => (255, 0, 255),
        Color::Cyan => (0, 255, 255),
        Color::White => (255, 255, 255),
        _ => (128, 128, 128),
    };
    let scale = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}
