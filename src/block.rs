//! Blocks: an immutable number and a palette colour.

/// Fixed block palette. A session plays with the first `color_count` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
}

impl BlockColor {
    pub const ALL: [Self; 6] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Magenta,
        Self::Cyan,
    ];

    /// Palette index 0..6, used by the theme to look up a display colour.
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Yellow => 3,
            Self::Magenta => 4,
            Self::Cyan => 5,
        }
    }
}

/// A single numbered block. Lives either in the falling slot or in one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub number: u8,
    pub color: BlockColor,
}

impl Block {
    pub const fn new(number: u8, color: BlockColor) -> Self {
        Self { number, color }
    }
}
