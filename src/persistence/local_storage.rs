//! Browser LocalStorage backend

use super::{HighScoreRecord, ScoreStore};
use crate::error::{StorageError, StorageResult};

/// LocalStorage key
const STORAGE_KEY: &str = "light_cycle_high_score";

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

fn storage() -> StorageResult<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StorageError::Unavailable("local storage"))
}

impl ScoreStore for LocalStorageStore {
    fn load(&mut self) -> u64 {
        let Ok(storage) = storage() else {
            log::warn!("LocalStorage unavailable, high score starts at 0");
            return 0;
        };

        match storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScoreRecord>(&json) {
                Ok(record) => {
                    log::info!("Loaded high score {}", record.high_score);
                    record.high_score
                }
                Err(err) => {
                    log::warn!("Ignoring stored high score: {}", err);
                    0
                }
            },
            _ => 0,
        }
    }

    fn save(&mut self, high_score: u64) -> StorageResult<()> {
        let storage = storage()?;
        let json = serde_json::to_string(&HighScoreRecord { high_score })?;
        storage
            .set_item(STORAGE_KEY, &json)
            .map_err(|_| StorageError::Unavailable("local storage write"))?;
        log::info!("High score {} saved", high_score);
        Ok(())
    }
}
