//! The falling piece: one block plus its position, with movement legality checks.

use crate::block::Block;
use crate::grid::Grid;

/// Active piece. `column`/`row` always lie inside the grid it moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingPiece {
    pub block: Block,
    pub column: usize,
    pub row: usize,
}

/// Where a hard drop ended and how many rows it fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropResult {
    pub column: usize,
    pub row: usize,
    pub distance: usize,
}

impl FallingPiece {
    pub fn new(block: Block, column: usize, row: usize) -> Self {
        Self { block, column, row }
    }

    /// Legal iff the column to the left exists and is empty at the current row.
    pub fn move_left(&mut self, grid: &Grid) -> bool {
        if self.column == 0 || !grid.is_free(self.column - 1, self.row) {
            return false;
        }
        self.column -= 1;
        true
    }

    pub fn move_right(&mut self, grid: &Grid) -> bool {
        if !grid.is_free(self.column + 1, self.row) {
            return false;
        }
        self.column += 1;
        true
    }

    pub fn can_descend(&self, grid: &Grid) -> bool {
        grid.is_free(self.column, self.row + 1)
    }

    /// One row down. `false` is the "can't descend" signal; the piece is unchanged.
    pub fn soft_drop(&mut self, grid: &Grid) -> bool {
        if !self.can_descend(grid) {
            return false;
        }
        self.row += 1;
        true
    }

    pub fn hard_drop(&mut self, grid: &Grid) -> DropResult {
        let start = self.row;
        while self.soft_drop(grid) {}
        DropResult {
            column: self.column,
            row: self.row,
            distance: self.row - start,
        }
    }

    /// Row a hard drop would land on, without moving.
    pub fn landing_row(&self, grid: &Grid) -> usize {
        let mut ghost = *self;
        ghost.hard_drop(grid).row
    }
}
