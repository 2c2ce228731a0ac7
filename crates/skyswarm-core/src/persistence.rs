//! Persistence boundary for the high score and the ranking table.
//!
//! The simulation only ever talks to a `ScoreStore`. Implementations
//! recover from their own failures and fall back to defaults; nothing
//! crossing this trait can fail.

use serde::{Deserialize, Serialize};

/// One ranking row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub name: String,
    pub score: u64,
}

/// Storage for the all-time high score and the top-N ranking.
pub trait ScoreStore: Send {
    /// Stored high score, or 0 when nothing is stored.
    fn load_high_score(&self) -> u64;
    fn save_high_score(&mut self, score: u64);
    /// Stored ranking, sorted by descending score. Empty when nothing is stored.
    fn load_ranking(&self) -> Vec<RankEntry>;
    fn save_ranking(&mut self, ranking: &[RankEntry]);
}

/// In-memory store. Used by tests and by hosts that do not persist.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub high_score: u64,
    pub ranking: Vec<RankEntry>,
}

impl ScoreStore for MemoryStore {
    fn load_high_score(&self) -> u64 {
        self.high_score
    }

    fn save_high_score(&mut self, score: u64) {
        self.high_score = score;
    }

    fn load_ranking(&self) -> Vec<RankEntry> {
        self.ranking.clone()
    }

    fn save_ranking(&mut self, ranking: &[RankEntry]) {
        self.ranking = ranking.to_vec();
    }
}
