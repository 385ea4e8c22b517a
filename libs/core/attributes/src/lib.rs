// [libs/core/attributes/src/lib.rs]
//! Attribute schema normalization (C4, §4.4).

pub mod naming;
pub mod normalizer;
pub mod stats;
pub mod text;
pub mod types;

pub use normalizer::normalize;
pub use stats::NormalizeStats;
