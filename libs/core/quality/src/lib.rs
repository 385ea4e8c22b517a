// [libs/core/quality/src/lib.rs]
//! Weighted quality scoring and report assembly (C5, §4.5).

pub mod reporter;
pub mod score;

pub use reporter::{generate, Bbox, GenerateInput};
pub use score::{compute_score, ScoreResult};
