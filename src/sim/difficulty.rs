//! Time-indexed difficulty lookup
//!
//! Rows are keyed by a start time. The active row is the last one whose
//! threshold is <= elapsed time (most recent match, never interpolated).

/// A row that takes effect at a threshold time (seconds)
pub trait Staged {
    fn threshold(&self) -> f32;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyTable<T> {
    /// Sorted by threshold, never empty
    rows: Vec<T>,
}

impl<T: Staged> DifficultyTable<T> {
    /// Build a table; `None` if `rows` is empty
    pub fn new(rows: Vec<T>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        Some(Self::from_rows(rows))
    }

    /// Build from rows known to be non-empty
    pub(crate) fn from_rows(mut rows: Vec<T>) -> Self {
        debug_assert!(!rows.is_empty());
        rows.sort_by(|a, b| a.threshold().total_cmp(&b.threshold()));
        Self { rows }
    }

    /// Index of the active row
    pub fn stage_index(&self, elapsed: f32) -> usize {
        // Count of rows whose threshold has been reached; the first row also
        // covers times before its threshold.
        let reached = self.rows.partition_point(|r| r.threshold() <= elapsed);
        reached.saturating_sub(1)
    }

    /// Active row for `elapsed` seconds
    pub fn lookup(&self, elapsed: f32) -> &T {
        &self.rows[self.stage_index(elapsed)]
    }
}
