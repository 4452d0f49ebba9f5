//! State-change notifications for the presentation layer.

use crate::block::{Block, BlockColor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PieceSpawned {
        block: Block,
        column: usize,
        row: usize,
    },
    /// The falling block locked into the grid.
    BlockPlaced {
        block: Block,
        column: usize,
        row: usize,
    },
    /// Cells are the positions before the collapse that followed the clear.
    GroupCleared {
        cells: Vec<(usize, usize)>,
        color: BlockColor,
        sum: u32,
        score_delta: u32,
    },
    ComboTriggered {
        count: u32,
        bonus: u32,
    },
    PauseToggled {
        paused: bool,
    },
    GameOver {
        score: u32,
    },
}
