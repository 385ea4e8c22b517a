// [libs/domain/pipeline/src/lib.rs]
//! Conversion orchestrator (C7, §4.7).

pub mod error;
pub mod orchestrator;
pub mod result;
pub mod summary;

pub use error::PipelineError;
pub use orchestrator::{process, ProcessParams};
pub use result::ConversionResult;
