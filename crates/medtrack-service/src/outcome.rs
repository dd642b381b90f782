//! Shared sweep outcome type.

use serde::{Deserialize, Serialize};

/// Summary of one sweep invocation, reported back to the job runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// Rows the sweep examined.
    pub examined: usize,
    /// Rows created or changed.
    pub affected: u64,
    /// Rows skipped (guards, dedup, existing work).
    pub skipped: usize,
    /// Rows whose processing failed and was contained.
    pub failed: usize,
}

impl SweepOutcome {
    /// Fold another outcome into this one.
    pub fn absorb(&mut self, other: SweepOutcome) {
        self.examined += other.examined;
        self.affected += other.affected;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}
