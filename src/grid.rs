//! Playfield: fixed-size grid of cells holding placed blocks.

use crate::block::Block;
use crate::error::EngineError;

/// Grid of cells. Row 0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// columns[x][y] = cell. Column-major so collapse works on one Vec at a time.
    columns: Vec<Vec<Option<Block>>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            columns: vec![vec![None; height]; width],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, column: usize, row: usize) -> bool {
        column < self.width && row < self.height
    }

    fn check(&self, column: usize, row: usize) -> Result<(), EngineError> {
        if self.in_bounds(column, row) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds {
                column,
                row,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, column: usize, row: usize) -> Result<Option<Block>, EngineError> {
        self.check(column, row)?;
        Ok(self.columns[column][row])
    }

    pub fn set(&mut self, column: usize, row: usize, cell: Option<Block>) -> Result<(), EngineError> {
        self.check(column, row)?;
        self.columns[column][row] = cell;
        Ok(())
    }

    /// Remove the block at a cell, leaving it empty.
    pub fn take(&mut self, column: usize, row: usize) -> Result<Option<Block>, EngineError> {
        self.check(column, row)?;
        Ok(self.columns[column][row].take())
    }

    pub fn is_occupied(&self, column: usize, row: usize) -> Result<bool, EngineError> {
        Ok(self.get(column, row)?.is_some())
    }

    /// Occupancy test for movement checks: anything outside the grid counts as blocked.
    #[inline]
    pub(crate) fn is_free(&self, column: usize, row: usize) -> bool {
        self.in_bounds(column, row) && self.columns[column][row].is_none()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, column: usize) -> Option<&[Option<Block>]> {
        self.columns.get(column).map(Vec::as_slice)
    }

    pub(crate) fn column_mut(&mut self, column: usize) -> Option<&mut Vec<Option<Block>>> {
        self.columns.get_mut(column)
    }

    /// Every occupied cell as `(column, row, block)`, column-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Block)> + '_ {
        self.columns.iter().enumerate().flat_map(|(x, col)| {
            col.iter()
                .enumerate()
                .filter_map(move |(y, cell)| cell.map(|b| (x, y, b)))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    pub fn clear(&mut self) {
        for col in &mut self.columns {
            col.fill(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockColor;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(6, 10);
        assert_eq!((grid.width(), grid.height()), (6, 10));
        assert!(grid.is_empty());
        assert_eq!(grid.get(5, 9), Ok(None));
    }

    #[test]
    fn test_set_then_get() {
        let mut grid = Grid::new(6, 10);
        let block = Block::new(3, BlockColor::Green);
        grid.set(2, 7, Some(block)).unwrap();
        assert_eq!(grid.get(2, 7), Ok(Some(block)));
        assert_eq!(grid.is_occupied(2, 7), Ok(true));
        assert_eq!(grid.is_occupied(2, 6), Ok(false));
        assert_eq!(grid.occupied().collect::<Vec<_>>(), vec![(2, 7, block)]);
    }

    #[test]
    fn test_out_of_bounds_access_fails() {
        let mut grid = Grid::new(6, 10);
        let err = EngineError::OutOfBounds {
            column: 6,
            row: 0,
            width: 6,
            height: 10,
        };
        assert_eq!(grid.get(6, 0), Err(err));
        assert_eq!(grid.set(6, 0, None), Err(err));
        assert!(grid.is_occupied(0, 10).is_err());
        assert!(grid.take(0, 10).is_err());
    }

    #[test]
    fn test_take_empties_cell() {
        let mut grid = Grid::new(3, 3);
        let block = Block::new(1, BlockColor::Red);
        grid.set(1, 1, Some(block)).unwrap();
        assert_eq!(grid.take(1, 1), Ok(Some(block)));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_is_free_treats_outside_as_blocked() {
        let grid = Grid::new(3, 3);
        assert!(grid.is_free(0, 0));
        assert!(!grid.is_free(3, 0));
        assert!(!grid.is_free(0, 3));
    }
}
