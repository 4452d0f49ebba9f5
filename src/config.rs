//! Static session configuration, fixed at construction.

use crate::block::BlockColor;
use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_WIDTH: usize = 6;
pub const DEFAULT_HEIGHT: usize = 10;
pub const DEFAULT_MAX_NUMBER: u8 = 4;
pub const DEFAULT_COLOR_COUNT: usize = 3;
pub const DEFAULT_LOOKAHEAD: usize = 2;
pub const DEFAULT_TICK_MS: u64 = 800;

/// Largest grid side accepted.
pub const MAX_GRID_SIDE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    /// Block numbers are drawn from `1..=max_number`.
    pub max_number: u8,
    /// Number of palette colours in play (taken from the front of [`BlockColor::ALL`]).
    pub color_count: usize,
    /// Upcoming blocks kept in the preview queue.
    pub lookahead: usize,
    /// Interval between gravity ticks; the front end owns the clock.
    pub tick_interval: Duration,
    /// Seed for the block generator; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_number: DEFAULT_MAX_NUMBER,
            color_count: DEFAULT_COLOR_COUNT,
            lookahead: DEFAULT_LOOKAHEAD,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let side_ok = |n: usize| (1..=MAX_GRID_SIDE).contains(&n);
        if !side_ok(self.width) || !side_ok(self.height) {
            return Err(ConfigError::GridSize {
                width: self.width,
                height: self.height,
                max: MAX_GRID_SIDE,
            });
        }
        if !(1..=9).contains(&self.max_number) {
            return Err(ConfigError::NumberRange(self.max_number));
        }
        if !(1..=BlockColor::ALL.len()).contains(&self.color_count) {
            return Err(ConfigError::ColorCount {
                count: self.color_count,
                max: BlockColor::ALL.len(),
            });
        }
        if self.lookahead == 0 {
            return Err(ConfigError::EmptyLookahead);
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }

    /// Colours in play.
    pub fn palette(&self) -> &'static [BlockColor] {
        &BlockColor::ALL[..self.color_count.min(BlockColor::ALL.len())]
    }

    /// Spawn cell column: the middle column (right of centre for even widths).
    pub fn spawn_column(&self) -> usize {
        self.width / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.spawn_column(), 3);
        assert_eq!(config.palette().len(), 3);
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = SessionConfig::default();
        let cases = [
            (SessionConfig { width: 0, ..base.clone() }, "grid"),
            (SessionConfig { height: 65, ..base.clone() }, "grid"),
            (SessionConfig { max_number: 0, ..base.clone() }, "numbers"),
            (SessionConfig { max_number: 10, ..base.clone() }, "numbers"),
            (SessionConfig { color_count: 0, ..base.clone() }, "colour"),
            (SessionConfig { color_count: 7, ..base.clone() }, "colour"),
            (SessionConfig { lookahead: 0, ..base.clone() }, "lookahead"),
            (
                SessionConfig {
                    tick_interval: Duration::ZERO,
                    ..base.clone()
                },
                "tick",
            ),
        ];
        for (config, needle) in cases {
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains(needle), "{err}");
        }
    }
}
