//! Simulated NFT token ids.
//!
//! No chain is contacted. A registration "mints" a token by drawing a number
//! from a [`TokenIdSource`]; the store checks the candidate against ids that
//! are already taken.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Upper bound (exclusive) of randomly drawn token ids.
pub const TOKEN_ID_RANGE: u64 = 100_000;

/// Supplier of candidate NFT token ids.
///
/// Implementations must be thread-safe (`Send + Sync`). Candidates are not
/// required to be unique.
pub trait TokenIdSource: Send + Sync {
    /// Draw the next candidate token id.
    fn next_token_id(&self) -> u64;
}

/// Uniform random token ids in `0..TOKEN_ID_RANGE`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenIds;

impl TokenIdSource for RandomTokenIds {
    fn next_token_id(&self) -> u64 {
        rand::thread_rng().gen_range(0..TOKEN_ID_RANGE)
    }
}

/// Deterministic token ids for testing.
/// WARNING: predictable, do not expose through a running server.
#[derive(Debug)]
pub struct SequentialTokenIds {
    next: AtomicU64,
    step: u64,
}

impl SequentialTokenIds {
    pub fn new(start: u64) -> Self {
        Self::with_step(start, 1)
    }

    /// A step of 0 yields the same candidate forever, which exercises
    /// the store's collision handling.
    pub fn with_step(start: u64, step: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
            step,
        }
    }
}

impl TokenIdSource for SequentialTokenIds {
    fn next_token_id(&self) -> u64 {
        self.next.fetch_add(self.step, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_stay_in_range() {
        let source = RandomTokenIds;
        for _ in 0..1_000 {
            assert!(source.next_token_id() < TOKEN_ID_RANGE);
        }
    }

    #[test]
    fn test_sequential_ids() {
        let source = SequentialTokenIds::new(10);
        assert_eq!(source.next_token_id(), 10);
        assert_eq!(source.next_token_id(), 11);

        let stuck = SequentialTokenIds::with_step(7, 0);
        assert_eq!(stuck.next_token_id(), 7);
        assert_eq!(stuck.next_token_id(), 7);
    }
}
