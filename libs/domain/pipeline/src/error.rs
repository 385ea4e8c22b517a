// [libs/domain/pipeline/src/error.rs]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Format(#[from] geoconvert_core_formats::FormatError),

    #[error(transparent)]
    Projection(#[from] geoconvert_core_projection::ProjectionError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input path does not exist: {0}")]
    MissingInput(String),
}
