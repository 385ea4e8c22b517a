// [libs/core/projection/src/error.rs]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("gdal error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("layer has no features to inspect")]
    EmptyLayer,
}
