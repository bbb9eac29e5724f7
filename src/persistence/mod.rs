//! High score persistence
//!
//! Only one value crosses this boundary. It is read once at startup and
//! written when a finished run beats it.
//!
//! Backends:
//! - [`MemoryStore`] for tests and throwaway sessions
//! - [`JsonFileStore`] on native (`{"high_score": n}`)
//! - [`LocalStorageStore`] on wasm32

use serde::{Deserialize, Serialize};

use crate::error::StorageResult;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// On-disk / in-storage shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

/// Where the high score lives between sessions
pub trait ScoreStore {
    /// Stored high score; missing or unreadable data reads as 0
    fn load(&mut self) -> u64;

    fn save(&mut self, high_score: u64) -> StorageResult<()>;
}

/// Keeps the score for the lifetime of the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub high_score: u64,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_score(high_score: u64) -> Self {
        Self {
            high_score,
            saves: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> u64 {
        self.high_score
    }

    fn save(&mut self, high_score: u64) -> StorageResult<()> {
        self.high_score = high_score;
        self.saves += 1;
        Ok(())
    }
}
