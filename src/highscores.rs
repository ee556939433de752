//! High score leaderboard
//!
//! Pure data: the top 10 scores with player names, sorted descending. Ties
//! keep insertion order. Storage is handled by the persistence layer.

use serde::{Deserialize, Serialize};

/// Maximum number of leaderboard entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

/// Ordered top-N score list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a score, keeping the list sorted descending and capped. Equal
    /// scores keep insertion order (the new entry goes after existing ones).
    /// Returns the 1-indexed rank, or `None` if the score fell off the end.
    pub fn add_score(&mut self, name: impl Into<String>, score: u32) -> Option<usize> {
        let entry = LeaderboardEntry {
            name: name.into(),
            score,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_ENTRIES);

        (pos < MAX_ENTRIES).then_some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest recorded score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse from JSON. Missing or corrupt data degrades to an empty board
    /// instead of failing.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(board) => board,
            Err(err) => {
                log::warn!("corrupt leaderboard data, starting fresh: {err}");
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{\"entries\":[]}".to_string())
    }
}
