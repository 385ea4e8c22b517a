// [libs/core/geometry/src/stats.rs]

use serde::{Deserialize, Serialize};

/// One invalid-geometry sample collected during phase 2 (§4.3), capped at 10.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidSample {
    pub index: usize,
    pub reason: String,
}

/// The five-phase pipeline's stats, returned alongside the cleaned dataset.
///
/// Invariant (§8): `duplicates_removed + null_geometry + unfixable + output
/// == input`. Enforced by `CleanStats::check_conservation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanStats {
    pub total_input: u64,
    pub null_geometry: u64,
    pub invalid_before: u64,
    pub fixed: u64,
    pub unfixable: u64,
    pub duplicates_removed: u64,
    pub total_output: u64,
    pub error_samples: Vec<InvalidSample>,
}

impl CleanStats {
    pub fn check_conservation(&self) -> bool {
        self.duplicates_removed + self.null_geometry + self.unfixable + self.total_output
            == self.total_input
    }
}
