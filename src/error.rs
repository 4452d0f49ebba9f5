//! Engine and configuration errors.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Direct grid access outside `[0, width) x [0, height)`.
    #[error("cell ({column}, {row}) is outside the {width}x{height} grid")]
    OutOfBounds {
        column: usize,
        row: usize,
        width: usize,
        height: usize,
    },
}

/// Rejected static configuration; reported once at session construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be between 1x1 and {max}x{max} cells, got {width}x{height}")]
    GridSize { width: usize, height: usize, max: usize },
    #[error("block numbers must top out between 1 and 9, got {0}")]
    NumberRange(u8),
    #[error("colour count must be between 1 and {max}, got {count}")]
    ColorCount { count: usize, max: usize },
    #[error("lookahead queue must hold at least one block")]
    EmptyLookahead,
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("prepared grid is {actual_width}x{actual_height}, config expects {width}x{height}")]
    GridMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}
