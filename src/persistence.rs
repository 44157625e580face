//! High-score storage. Failures here never interrupt play.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::error::ScoreError;

pub trait HighScoreStore {
    fn load(&self) -> Result<u32, ScoreError>;
    fn save(&mut self, score: u32) -> Result<(), ScoreError>;
}

/// Stores the score as a decimal number in a text file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> Result<u32, ScoreError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(text.trim().parse::<u32>()?)
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreError> {
        fs::write(&self.path, score.to_string())?;
        Ok(())
    }
}

/// Missing or unreadable records count as a high score of 0.
pub fn load_high_score(store: &impl HighScoreStore) -> u32 {
    match store.load() {
        Ok(score) => {
            info!("Loaded high score {}", score);
            score
        }
        Err(e) => {
            warn!("No usable high score, starting from 0: {}", e);
            0
        }
    }
}

pub fn save_high_score(store: &mut impl HighScoreStore, score: u32) {
    match store.save(score) {
        Ok(()) => info!("Saved high score {}", score),
        Err(e) => warn!("Failed to save high score {}: {}", score, e),
    }
}
