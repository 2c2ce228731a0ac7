//! Top-N ranking table.
//!
//! Sorted by descending score; loaded from and saved through the
//! session's `ScoreStore`.

use skyswarm_core::constants::*;
use skyswarm_core::persistence::RankEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub entries: Vec<RankEntry>,
}

impl Ranking {
    /// Build from stored rows, re-sorting and truncating defensively
    /// against hand-edited files.
    pub fn from_entries(mut entries: Vec<RankEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(RANKING_MAX);
        Self { entries }
    }

    /// Check if a score qualifies for the table.
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < RANKING_MAX {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank (1-indexed) a score would take, or None if it doesn't qualify.
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let pos = self.entries.iter().position(|e| score > e.score);
        Some(pos.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a score under `name`. Returns the rank achieved, if any.
    pub fn insert(&mut self, name: &str, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            RankEntry {
                name: sanitize_name(name),
                score,
            },
        );
        self.entries.truncate(RANKING_MAX);
        Some(rank)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Uppercase, keep letters, digits and spaces, cap the length, and fall
/// back to the default name when nothing is left.
pub fn sanitize_name(raw: &str) -> String {
    let name: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_uppercase())
        .take(RANKING_NAME_MAX_LEN)
        .collect();
    let name = name.trim().to_string();
    if name.is_empty() {
        RANKING_DEFAULT_NAME.to_string()
    } else {
        name
    }
}
