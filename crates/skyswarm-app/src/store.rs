//! JSON file persistence for the high score and the ranking table.
//!
//! Failures never reach the simulation: a missing or corrupt file loads as
//! the default value and a failed write is logged and dropped.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use skyswarm_core::persistence::{RankEntry, ScoreStore};

pub const HIGH_SCORE_FILE: &str = "highscore.json";
pub const RANKING_FILE: &str = "ranking.json";

/// Errors raised while reading or writing a score file.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Score store backed by two JSON files in one directory.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    dir: PathBuf,
}

impl JsonScoreStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<T, StoreError> {
        let text = fs::read_to_string(self.dir.join(file))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let text = serde_json::to_string_pretty(value)?;
        fs::write(self.dir.join(file), text)?;
        Ok(())
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        match self.read(file) {
            Ok(value) => value,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => T::default(),
            Err(e) => {
                log::warn!("could not load {file} from {}: {e}", self.dir.display());
                T::default()
            }
        }
    }

    fn write_or_warn<T: Serialize + ?Sized>(&self, file: &str, value: &T) {
        if let Err(e) = self.write(file, value) {
            log::warn!("could not save {file} to {}: {e}", self.dir.display());
        }
    }
}

impl ScoreStore for JsonScoreStore {
    fn load_high_score(&self) -> u64 {
        self.read_or_default(HIGH_SCORE_FILE)
    }

    fn save_high_score(&mut self, score: u64) {
        self.write_or_warn(HIGH_SCORE_FILE, &score);
    }

    fn load_ranking(&self) -> Vec<RankEntry> {
        self.read_or_default(RANKING_FILE)
    }

    fn save_ranking(&mut self, ranking: &[RankEntry]) {
        self.write_or_warn(RANKING_FILE, ranking);
    }
}
