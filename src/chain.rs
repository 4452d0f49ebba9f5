//! Chain resolution: clear, collapse, repeat until the grid is stable.

use crate::grid::Grid;
use crate::resolve::{self, ClearedGroup};

/// Chains of at least this length earn a bonus.
pub const MIN_COMBO_CHAIN: u32 = 2;
/// Bonus per chain step once the chain qualifies.
pub const COMBO_BONUS_PER_CHAIN: u32 = 50;

/// Resolver state. `Resolving` only exists inside [`resolve_chain`]; callers observe `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainState {
    #[default]
    Idle,
    Resolving,
}

/// Outcome of resolving one lock.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainReport {
    /// Successive scans that removed at least one group.
    pub chain: u32,
    /// Every group removed, in the order the scans found them.
    pub cleared: Vec<ClearedGroup>,
    /// Sum of the per-group clear scores.
    pub clear_points: u32,
    pub bonus: u32,
}

impl ChainReport {
    pub fn total_points(&self) -> u32 {
        self.clear_points + self.bonus
    }

    pub fn is_combo(&self) -> bool {
        self.chain >= MIN_COMBO_CHAIN
    }

    pub fn blocks_cleared(&self) -> usize {
        self.cleared.iter().map(|c| c.group.len()).sum()
    }
}

pub fn combo_bonus(chain: u32) -> u32 {
    if chain >= MIN_COMBO_CHAIN {
        chain * COMBO_BONUS_PER_CHAIN
    } else {
        0
    }
}

/// Run passes until one removes nothing. Every group of a pass is removed before the
/// single collapse that follows it, so a chain step is one scan, not one group.
pub fn resolve_chain(grid: &mut Grid, state: &mut ChainState) -> ChainReport {
    *state = ChainState::Resolving;
    let mut report = ChainReport::default();
    loop {
        let cleared = resolve::clear_groups(grid);
        if cleared.is_empty() {
            break;
        }
        resolve::apply_gravity(grid);
        report.chain += 1;
        report.clear_points += cleared.iter().map(|c| c.score_delta).sum::<u32>();
        report.cleared.extend(cleared);
    }
    report.bonus = combo_bonus(report.chain);
    *state = ChainState::Idle;
    report
}
