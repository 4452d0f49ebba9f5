//! Group detection, the sum-of-ten clear rule, removal and column collapse.

use crate::block::BlockColor;
use crate::grid::Grid;

/// Numbers in a clearable group add up to a positive multiple of this.
pub const CLEAR_MODULUS: u32 = 10;
/// Score per removed block.
pub const POINTS_PER_BLOCK: u32 = 10;

const NEIGHBOURS_4: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Maximal 4-connected set of same-coloured occupied cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub color: BlockColor,
    /// `(column, row)` of every member, in discovery order.
    pub cells: Vec<(usize, usize)>,
    pub sum: u32,
}

impl Group {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_clearable(&self) -> bool {
        self.sum > 0 && self.sum % CLEAR_MODULUS == 0
    }
}

/// A group removed by one pass, with the points it earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedGroup {
    pub group: Group,
    pub score_delta: u32,
}

/// Visited mask, fresh for every pass.
struct Visited {
    height: usize,
    bits: Vec<bool>,
}

impl Visited {
    fn new(width: usize, height: usize) -> Self {
        Self {
            height,
            bits: vec![false; width * height],
        }
    }

    /// Mark a cell; `true` if it was not marked yet.
    fn mark(&mut self, column: usize, row: usize) -> bool {
        let i = column * self.height + row;
        !std::mem::replace(&mut self.bits[i], true)
    }
}

/// Depth-first flood fill from `(column, row)` over same-coloured neighbours.
fn flood_fill(grid: &Grid, visited: &mut Visited, column: usize, row: usize) -> Option<Group> {
    let seed = grid.get(column, row).ok().flatten()?;
    if !visited.mark(column, row) {
        return None;
    }
    let mut group = Group {
        color: seed.color,
        cells: Vec::new(),
        sum: 0,
    };
    let mut stack = vec![(column, row, seed.number)];
    while let Some((x, y, number)) = stack.pop() {
        group.cells.push((x, y));
        group.sum += u32::from(number);
        for (dx, dy) in NEIGHBOURS_4 {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if let Ok(Some(b)) = grid.get(nx, ny) {
                if b.color == seed.color && visited.mark(nx, ny) {
                    stack.push((nx, ny, b.number));
                }
            }
        }
    }
    Some(group)
}

/// All groups on the grid, scanning column-major. Groups are disjoint and cover every block.
pub fn find_groups(grid: &Grid) -> Vec<Group> {
    let mut visited = Visited::new(grid.width(), grid.height());
    let mut groups = Vec::new();
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            if let Some(group) = flood_fill(grid, &mut visited, x, y) {
                groups.push(group);
            }
        }
    }
    groups
}

/// One scan: remove every clearable group. Score is `size * POINTS_PER_BLOCK` per group.
/// Does not collapse; see [`apply_gravity`].
pub fn clear_groups(grid: &mut Grid) -> Vec<ClearedGroup> {
    let mut cleared = Vec::new();
    for group in find_groups(grid) {
        if !group.is_clearable() {
            continue;
        }
        for &(x, y) in &group.cells {
            let removed = grid.take(x, y);
            debug_assert!(
                matches!(removed, Ok(Some(_))),
                "scanned cell ({x}, {y}) must hold a block"
            );
        }
        let score_delta = group.len() as u32 * POINTS_PER_BLOCK;
        cleared.push(ClearedGroup { group, score_delta });
    }
    cleared
}

/// Stable per-column compaction toward the bottom. Returns whether anything moved.
pub fn apply_gravity(grid: &mut Grid) -> bool {
    let mut moved = false;
    for x in 0..grid.width() {
        let Some(column) = grid.column_mut(x) else {
            continue;
        };
        let height = column.len();
        let blocks: Vec<_> = column.iter().flatten().copied().collect();
        let gap = height - blocks.len();
        let compacted = std::iter::repeat_n(None, gap).chain(blocks.into_iter().map(Some));
        for (cell, new) in column.iter_mut().zip(compacted) {
            if *cell != new {
                moved = true;
                *cell = new;
            }
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    const R: BlockColor = BlockColor::Red;
    const G: BlockColor = BlockColor::Green;

    fn put(grid: &mut Grid, x: usize, y: usize, n: u8, c: BlockColor) {
        grid.set(x, y, Some(Block::new(n, c))).unwrap();
    }

    fn random_grid(rng: &mut StdRng, width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height);
        for x in 0..width {
            for y in 0..height {
                if rng.random_bool(0.6) {
                    let color = BlockColor::ALL[rng.random_range(0..3)];
                    put(&mut grid, x, y, rng.random_range(1..=5), color);
                }
            }
        }
        grid
    }

    #[test]
    fn test_flood_fill_follows_colour_only() {
        let mut grid = Grid::new(3, 3);
        put(&mut grid, 0, 2, 1, R);
        put(&mut grid, 1, 2, 2, G);
        put(&mut grid, 2, 2, 3, R);
        put(&mut grid, 0, 1, 4, R);
        let groups = find_groups(&grid);
        assert_eq!(groups.len(), 3);
        let left = groups.iter().find(|g| g.cells.contains(&(0, 2))).unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left.sum, 5);
    }

    #[test]
    fn test_diagonals_do_not_connect() {
        let mut grid = Grid::new(2, 2);
        put(&mut grid, 0, 0, 5, R);
        put(&mut grid, 1, 1, 5, R);
        assert_eq!(find_groups(&grid).len(), 2);
        assert!(clear_groups(&mut grid).is_empty());
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    fn test_clearable_only_on_positive_multiple_of_ten() {
        let group = |sum| Group {
            color: R,
            cells: vec![(0, 0)],
            sum,
        };
        assert!(!group(0).is_clearable());
        assert!(!group(9).is_clearable());
        assert!(group(10).is_clearable());
        assert!(!group(15).is_clearable());
        assert!(group(20).is_clearable());
    }

    #[test]
    fn test_clear_removes_sum_ten_group_and_scores_per_block() {
        let mut grid = Grid::new(4, 4);
        // Numbers 2, 3, 4, 1 in an L shape.
        put(&mut grid, 0, 3, 2, R);
        put(&mut grid, 1, 3, 3, R);
        put(&mut grid, 2, 3, 4, R);
        put(&mut grid, 2, 2, 1, R);
        put(&mut grid, 3, 3, 4, G);
        let cleared = clear_groups(&mut grid);
        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared[0].score_delta, 40);
        assert_eq!(cleared[0].group.sum, 10);
        assert_eq!(grid.occupied().collect::<Vec<_>>(), vec![(3, 3, Block::new(4, G))]);
    }

    #[test]
    fn test_every_clearable_group_in_a_pass_is_removed() {
        let mut grid = Grid::new(4, 2);
        put(&mut grid, 0, 1, 5, R);
        put(&mut grid, 0, 0, 5, R);
        put(&mut grid, 3, 1, 6, G);
        put(&mut grid, 3, 0, 4, G);
        put(&mut grid, 1, 1, 3, G);
        let cleared = clear_groups(&mut grid);
        assert_eq!(cleared.len(), 2);
        assert_eq!(grid.occupied().collect::<Vec<_>>(), vec![(1, 1, Block::new(3, G))]);
    }

    #[test]
    fn test_gravity_compacts_stably() {
        let mut grid = Grid::new(1, 5);
        put(&mut grid, 0, 0, 1, R);
        put(&mut grid, 0, 2, 2, G);
        put(&mut grid, 0, 4, 3, R);
        assert!(apply_gravity(&mut grid));
        let column: Vec<_> = grid.column(0).unwrap().to_vec();
        assert_eq!(
            column,
            vec![
                None,
                None,
                Some(Block::new(1, R)),
                Some(Block::new(2, G)),
                Some(Block::new(3, R)),
            ]
        );
        assert!(!apply_gravity(&mut grid));
    }

    #[test]
    fn test_gravity_properties_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut grid = random_grid(&mut rng, 6, 10);
            let before: Vec<Vec<Block>> = (0..6)
                .map(|x| grid.column(x).unwrap().iter().flatten().copied().collect())
                .collect();
            apply_gravity(&mut grid);
            for (x, expected) in before.iter().enumerate() {
                let column = grid.column(x).unwrap();
                let after: Vec<Block> = column.iter().flatten().copied().collect();
                assert_eq!(&after, expected);
                // No hole below a block.
                let first = column.iter().position(Option::is_some).unwrap_or(column.len());
                assert!(column[first..].iter().all(Option::is_some));
            }
        }
    }

    #[test]
    fn test_group_properties_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let grid = random_grid(&mut rng, 6, 10);
            let groups = find_groups(&grid);
            let mut seen = HashSet::new();
            for group in &groups {
                let members: HashSet<_> = group.cells.iter().copied().collect();
                assert_eq!(members.len(), group.len());
                let mut sum = 0;
                for &(x, y) in &group.cells {
                    assert!(seen.insert((x, y)), "cell in two groups");
                    let b = grid.get(x, y).unwrap().unwrap();
                    assert_eq!(b.color, group.color);
                    sum += u32::from(b.number);
                }
                assert_eq!(sum, group.sum);
                // Connected: a walk inside the member set from the first cell reaches all.
                let mut reached = HashSet::from([group.cells[0]]);
                let mut stack = vec![group.cells[0]];
                while let Some((x, y)) = stack.pop() {
                    for (dx, dy) in NEIGHBOURS_4 {
                        if let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
                            if members.contains(&(nx, ny)) && reached.insert((nx, ny)) {
                                stack.push((nx, ny));
                            }
                        }
                    }
                }
                assert_eq!(reached, members);
            }
            assert_eq!(seen.len(), grid.occupied_count());
        }
    }

    #[test]
    fn test_unclearable_groups_survive_a_pass() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..100 {
            let mut grid = random_grid(&mut rng, 6, 10);
            let keep: Vec<Group> = find_groups(&grid)
                .into_iter()
                .filter(|g| !g.is_clearable())
                .collect();
            let before = grid.clone();
            let cleared = clear_groups(&mut grid);
            assert!(cleared.iter().all(|c| c.group.is_clearable()));
            for group in &keep {
                for &(x, y) in &group.cells {
                    assert_eq!(grid.get(x, y), before.get(x, y));
                }
            }
        }
    }
}
