//! JSON file backend for native builds

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{HighScoreRecord, ScoreStore};
use crate::error::StorageResult;

/// High score kept in a small JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record; a missing file is an empty record, not an error
    pub fn read(&self) -> StorageResult<HighScoreRecord> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HighScoreRecord::default()),
            Err(err) => Err(err.into()),
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> u64 {
        match self.read() {
            Ok(record) => {
                log::info!("Loaded high score {} from {}", record.high_score, self.path.display());
                record.high_score
            }
            Err(err) => {
                log::warn!("Ignoring high score file {}: {}", self.path.display(), err);
                0
            }
        }
    }

    fn save(&mut self, high_score: u64) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&HighScoreRecord { high_score })?;
        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("High score {} saved to {}", high_score, self.path.display());
        Ok(())
    }
}
