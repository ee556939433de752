//! Best score / leaderboard storage
//!
//! A narrow interface over wherever scores live: LocalStorage on the web,
//! memory for native runs and tests. Missing or corrupt data degrades to
//! safe defaults; the engine never fails over persistence.

use crate::highscores::Leaderboard;

/// Storage key for the best score
pub const BEST_KEY: &str = "snake-rush-best";
/// Storage key for the leaderboard
pub const LEADERBOARD_KEY: &str = "snake-rush-leaderboard";

/// Persistence collaborator consumed by the session controller
pub trait ScoreStore {
    fn load_best_score(&self) -> u32;
    fn save_best_score(&mut self, score: u32);
    fn load_leaderboard(&self) -> Leaderboard;
    fn save_leaderboard(&mut self, board: &Leaderboard);
}

/// In-memory store for native runs and deterministic tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u32,
    leaderboard: Leaderboard,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load_best_score(&self) -> u32 {
        self.best
    }

    fn save_best_score(&mut self, score: u32) {
        self.best = score;
    }

    fn load_leaderboard(&self) -> Leaderboard {
        self.leaderboard.clone()
    }

    fn save_leaderboard(&mut self, board: &Leaderboard) {
        self.leaderboard = board.clone();
    }
}

/// Browser LocalStorage store (wasm32 only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn load_best_score(&self) -> u32 {
        let Some(storage) = Self::storage() else {
            return 0;
        };
        match storage.get_item(BEST_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("corrupt best score {raw:?}, using 0");
                0
            }),
            _ => 0,
        }
    }

    fn save_best_score(&mut self, score: u32) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(BEST_KEY, &score.to_string());
        }
    }

    fn load_leaderboard(&self) -> Leaderboard {
        let Some(storage) = Self::storage() else {
            return Leaderboard::new();
        };
        match storage.get_item(LEADERBOARD_KEY) {
            Ok(Some(json)) => Leaderboard::from_json(&json),
            _ => Leaderboard::new(),
        }
    }

    fn save_leaderboard(&mut self, board: &Leaderboard) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(LEADERBOARD_KEY, &board.to_json());
            log::info!("leaderboard saved ({} entries)", board.entries.len());
        }
    }
}
