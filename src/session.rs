//! Game session: spawn, fall, lock, resolve, respawn; pause and game over.

use crate::block::Block;
use crate::chain::{self, ChainState};
use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::event::GameEvent;
use crate::generator::{BlockSource, PieceGenerator, PieceQueue};
use crate::grid::Grid;
use crate::piece::FallingPiece;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
    GameOver,
}

/// Running totals for the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub pieces_placed: u32,
    pub groups_cleared: u32,
    pub blocks_cleared: u32,
    pub combos: u32,
    pub best_chain: u32,
}

/// One game. Owns the grid, the queue, the falling piece and the score.
///
/// Commands return `true` when they changed state. Commands issued while paused or
/// after game over are ignored and return `false`.
#[derive(Debug)]
pub struct Session<S = PieceGenerator<StdRng>> {
    config: SessionConfig,
    grid: Grid,
    queue: PieceQueue<S>,
    falling: Option<FallingPiece>,
    score: u32,
    /// Chain length of the most recent lock.
    chain_count: u32,
    chain_state: ChainState,
    game_over: bool,
    /// "Thinking" pause: no ticks, no movement.
    paused: bool,
    stats: Stats,
    events: Vec<GameEvent>,
}

impl Session {
    /// Seeded from `config.seed`, or from the OS when unset.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Session<PieceGenerator<R>> {
    pub fn with_rng(config: SessionConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = PieceGenerator::new(rng, config.max_number, config.palette());
        let grid = Grid::new(config.width, config.height);
        Self::with_source(config, generator, grid)
    }
}

impl<S: BlockSource> Session<S> {
    /// Start from a prepared board, taking blocks from `source` instead of the random generator.
    pub fn with_source(config: SessionConfig, source: S, grid: Grid) -> Result<Self, ConfigError> {
        config.validate()?;
        if (grid.width(), grid.height()) != (config.width, config.height) {
            return Err(ConfigError::GridMismatch {
                width: config.width,
                height: config.height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        let queue = PieceQueue::new(source, config.lookahead);
        let mut session = Self {
            config,
            grid,
            queue,
            falling: None,
            score: 0,
            chain_count: 0,
            chain_state: ChainState::Idle,
            game_over: false,
            paused: false,
            stats: Stats::default(),
            events: Vec::new(),
        };
        session.spawn_next();
        Ok(session)
    }

    /// Begin a fresh game on an empty grid.
    pub fn start(&mut self) {
        self.grid.clear();
        self.queue.reset();
        self.falling = None;
        self.score = 0;
        self.chain_count = 0;
        self.chain_state = ChainState::Idle;
        self.game_over = false;
        self.paused = false;
        self.stats = Stats::default();
        self.events.clear();
        self.spawn_next();
    }

    fn accepts_input(&self) -> bool {
        !self.game_over && !self.paused
    }

    pub fn move_left(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        match self.falling.as_mut() {
            Some(piece) => piece.move_left(&self.grid),
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        match self.falling.as_mut() {
            Some(piece) => piece.move_right(&self.grid),
            None => false,
        }
    }

    /// One row down. Never locks; `false` means the piece is resting.
    pub fn soft_drop(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        match self.falling.as_mut() {
            Some(piece) => piece.soft_drop(&self.grid),
            None => false,
        }
    }

    /// Drop to the resting row, lock, resolve and spawn the next piece.
    pub fn hard_drop(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.falling.as_mut() else {
            return false;
        };
        piece.hard_drop(&self.grid);
        self.lock_piece();
        true
    }

    /// Gravity step: descend one row, or lock when resting.
    pub fn tick(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.falling.as_mut() else {
            return false;
        };
        if !piece.soft_drop(&self.grid) {
            self.lock_piece();
        }
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = !self.paused;
        self.events.push(GameEvent::PauseToggled {
            paused: self.paused,
        });
        true
    }

    fn lock_piece(&mut self) {
        let piece = match self.falling.take() {
            Some(p) => p,
            None => return,
        };
        // The controller keeps the piece inside the grid; anything else is terminal.
        if self
            .grid
            .set(piece.column, piece.row, Some(piece.block))
            .is_err()
        {
            self.end_game();
            return;
        }
        self.stats.pieces_placed += 1;
        self.events.push(GameEvent::BlockPlaced {
            block: piece.block,
            column: piece.column,
            row: piece.row,
        });

        let report = chain::resolve_chain(&mut self.grid, &mut self.chain_state);
        self.chain_count = report.chain;
        for cleared in &report.cleared {
            self.score += cleared.score_delta;
            self.stats.groups_cleared += 1;
            self.stats.blocks_cleared += cleared.group.len() as u32;
            self.events.push(GameEvent::GroupCleared {
                cells: cleared.group.cells.clone(),
                color: cleared.group.color,
                sum: cleared.group.sum,
                score_delta: cleared.score_delta,
            });
        }
        if report.is_combo() {
            self.score += report.bonus;
            self.stats.combos += 1;
            self.events.push(GameEvent::ComboTriggered {
                count: report.chain,
                bonus: report.bonus,
            });
        }
        self.stats.best_chain = self.stats.best_chain.max(report.chain);

        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let column = self.config.spawn_column();
        if !self.grid.is_free(column, 0) {
            self.end_game();
            return;
        }
        let block = self.queue.pop();
        self.falling = Some(FallingPiece::new(block, column, 0));
        self.events.push(GameEvent::PieceSpawned {
            block,
            column,
            row: 0,
        });
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.falling = None;
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn falling(&self) -> Option<&FallingPiece> {
        self.falling.as_ref()
    }

    /// Row the falling piece would land on after a hard drop.
    pub fn landing_row(&self) -> Option<usize> {
        self.falling.as_ref().map(|p| p.landing_row(&self.grid))
    }

    /// Upcoming blocks, next first.
    pub fn queue(&self) -> impl ExactSizeIterator<Item = &Block> + '_ {
        self.queue.peek()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn chain_count(&self) -> u32 {
        self.chain_count
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else {
            match self.chain_state {
                ChainState::Idle => Phase::Idle,
                ChainState::Resolving => Phase::Resolving,
            }
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockColor;

    fn config() -> SessionConfig {
        SessionConfig {
            seed: Some(11),
            ..SessionConfig::default()
        }
    }

    fn session() -> Session {
        Session::new(config()).unwrap()
    }

    #[test]
    fn test_new_session_spawns_at_top_centre() {
        let s = session();
        let piece = s.falling().unwrap();
        assert_eq!((piece.column, piece.row), (3, 0));
        assert_eq!(s.queue().len(), 2);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.score(), 0);
        assert!(matches!(s.events(), [GameEvent::PieceSpawned { column: 3, row: 0, .. }]));
    }

    #[test]
    fn test_spawn_pulls_from_queue_head() {
        let mut s = session();
        let next = *s.queue().next().unwrap();
        assert!(s.hard_drop());
        assert_eq!(s.falling().unwrap().block, next);
        assert_eq!(s.queue().len(), 2);
    }

    #[test]
    fn test_tick_descends_then_locks() {
        let mut s = session();
        let block = s.falling().unwrap().block;
        for row in 1..10 {
            assert!(s.tick());
            assert_eq!(s.falling().unwrap().row, row);
        }
        assert!(s.tick());
        assert_eq!(s.grid().get(3, 9), Ok(Some(block)));
        assert_eq!(s.falling().unwrap().row, 0);
        assert_eq!(s.stats().pieces_placed, 1);
    }

    #[test]
    fn test_soft_drop_never_locks() {
        let mut s = session();
        while s.soft_drop() {}
        assert_eq!(s.falling().unwrap().row, 9);
        assert!(!s.soft_drop());
        assert!(s.grid().is_empty());
    }

    #[test]
    fn test_pause_blocks_commands() {
        let mut s = session();
        assert!(s.toggle_pause());
        assert!(s.is_paused());
        let before = *s.falling().unwrap();
        assert!(!s.move_left());
        assert!(!s.move_right());
        assert!(!s.soft_drop());
        assert!(!s.hard_drop());
        assert!(!s.tick());
        assert_eq!(*s.falling().unwrap(), before);
        assert!(s.toggle_pause());
        assert!(s.move_left());
    }

    #[test]
    fn test_start_resets_everything() {
        let mut s = session();
        s.hard_drop();
        s.toggle_pause();
        s.start();
        assert!(s.grid().is_empty());
        assert!(!s.is_paused());
        assert_eq!(s.stats(), Stats::default());
        assert_eq!(s.score(), 0);
        assert_eq!(s.drain_events().len(), 1);
    }

    fn generator() -> PieceGenerator<StdRng> {
        PieceGenerator::new(StdRng::seed_from_u64(1), 4, &BlockColor::ALL[..3])
    }

    #[test]
    fn test_prepared_grid_must_match_config() {
        let err = Session::with_source(config(), generator(), Grid::new(5, 10)).unwrap_err();
        assert!(matches!(err, ConfigError::GridMismatch { actual_width: 5, .. }));
    }

    #[test]
    fn test_occupied_spawn_cell_is_game_over() {
        let mut grid = Grid::new(6, 10);
        grid.set(3, 0, Some(Block::new(1, BlockColor::Red))).unwrap();
        let mut s = Session::with_source(config(), generator(), grid).unwrap();
        assert_eq!(s.phase(), Phase::GameOver);
        assert!(s.falling().is_none());
        assert!(!s.tick());
        assert!(!s.toggle_pause());
        assert!(matches!(s.events().last(), Some(GameEvent::GameOver { score: 0 })));
    }

    #[test]
    fn test_unplaceable_piece_ends_the_game() {
        let mut s = session();
        let block = s.falling().unwrap().block;
        s.falling = Some(FallingPiece::new(block, 99, 0));
        assert!(s.tick());
        assert!(s.is_game_over());
        assert!(s.falling().is_none());
        assert!(s.grid().is_empty());
        assert!(matches!(s.events().last(), Some(GameEvent::GameOver { score: 0 })));
    }
}
