//! Per-game high score
//!
//! A single scalar per game, read once at startup and written only when a
//! finished run beats it.

use crate::persistence::{ScoreStore, StorageError};

/// Best score for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    key: &'static str,
    best: u64,
}

impl HighScore {
    /// Load the stored best for `key`; unreadable values count as zero
    pub fn load<S: ScoreStore + ?Sized>(store: &S, key: &'static str) -> Self {
        let best = match store.load(key) {
            Ok(Some(best)) => {
                log::info!("Loaded high score {} for {}", best, key);
                best
            }
            Ok(None) => {
                log::info!("No high score for {}, starting fresh", key);
                0
            }
            Err(e) => {
                log::warn!("Ignoring stored high score: {}", e);
                0
            }
        };
        Self { key, best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Check if a score would set a new record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record `score` if it beats the best. Returns true on a new record.
    ///
    /// The in-memory best is updated even if the write fails.
    pub fn submit<S: ScoreStore + ?Sized>(
        &mut self,
        score: u64,
        store: &mut S,
    ) -> Result<bool, StorageError> {
        if !self.qualifies(score) {
            return Ok(false);
        }
        self.best = score;
        store.save(self.key, score)?;
        log::info!("New high score {} saved for {}", score, self.key);
        Ok(true)
    }
}
