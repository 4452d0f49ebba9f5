//! Random block descriptors and the lookahead queue.

use crate::block::{Block, BlockColor};
use rand::Rng;
use std::collections::VecDeque;

/// Where upcoming blocks come from. The session only ever asks for the next one.
pub trait BlockSource {
    fn next_block(&mut self) -> Block;
}

/// Independent uniform draws: number from `1..=max_number`, colour from the palette.
/// No bag and no anti-repeat.
#[derive(Debug, Clone)]
pub struct PieceGenerator<R> {
    rng: R,
    max_number: u8,
    palette: &'static [BlockColor],
}

impl<R: Rng> PieceGenerator<R> {
    pub fn new(rng: R, max_number: u8, palette: &'static [BlockColor]) -> Self {
        debug_assert!(max_number >= 1 && !palette.is_empty());
        Self {
            rng,
            max_number,
            palette,
        }
    }

    pub fn draw(&mut self) -> Block {
        let number = self.rng.random_range(1..=self.max_number);
        let color = self.palette[self.rng.random_range(0..self.palette.len())];
        Block::new(number, color)
    }
}

impl<R: Rng> BlockSource for PieceGenerator<R> {
    fn next_block(&mut self) -> Block {
        self.draw()
    }
}

/// FIFO of upcoming blocks with constant length: `pop` takes the head and refills the tail.
#[derive(Debug, Clone)]
pub struct PieceQueue<S> {
    source: S,
    upcoming: VecDeque<Block>,
    lookahead: usize,
}

impl<S: BlockSource> PieceQueue<S> {
    pub fn new(source: S, lookahead: usize) -> Self {
        let mut queue = Self {
            source,
            upcoming: VecDeque::with_capacity(lookahead + 1),
            lookahead,
        };
        queue.refill();
        queue
    }

    fn refill(&mut self) {
        while self.upcoming.len() < self.lookahead {
            let block = self.source.next_block();
            self.upcoming.push_back(block);
        }
    }

    /// Drop the current preview and draw a fresh one.
    pub fn reset(&mut self) {
        self.upcoming.clear();
        self.refill();
    }

    pub fn pop(&mut self) -> Block {
        let head = match self.upcoming.pop_front() {
            Some(b) => b,
            None => self.source.next_block(),
        };
        self.refill();
        head
    }

    /// Upcoming blocks, head first.
    pub fn peek(&self) -> impl ExactSizeIterator<Item = &Block> + '_ {
        self.upcoming.iter()
    }

    pub fn front(&self) -> Option<&Block> {
        self.upcoming.front()
    }

    pub fn len(&self) -> usize {
        self.upcoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn generator(seed: u64) -> PieceGenerator<StdRng> {
        PieceGenerator::new(StdRng::seed_from_u64(seed), 4, &BlockColor::ALL[..3])
    }

    #[test]
    fn test_draws_stay_in_range() {
        let mut g = generator(7);
        let mut numbers = HashSet::new();
        let mut colors = HashSet::new();
        for _ in 0..500 {
            let b = g.draw();
            assert!((1..=4).contains(&b.number));
            assert!(BlockColor::ALL[..3].contains(&b.color));
            numbers.insert(b.number);
            colors.insert(b.color);
        }
        assert_eq!(numbers.len(), 4);
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = generator(42);
        let mut b = generator(42);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_queue_is_fifo_with_constant_length() {
        let mut queue = PieceQueue::new(generator(3), 2);
        assert_eq!(queue.len(), 2);
        let preview: Vec<Block> = queue.peek().copied().collect();
        let first = queue.pop();
        assert_eq!(first, preview[0]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.front(), Some(&preview[1]));
        assert_eq!(queue.pop(), preview[1]);
    }

    #[test]
    fn test_queue_reset_keeps_length() {
        let mut queue = PieceQueue::new(generator(9), 3);
        queue.pop();
        queue.reset();
        assert_eq!(queue.len(), 3);
        assert!(!queue.is_empty());
    }
}
