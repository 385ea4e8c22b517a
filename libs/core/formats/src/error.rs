// [libs/core/formats/src/error.rs]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("gdal error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("no recognized geospatial file found in archive")]
    NoPrincipalFileInArchive,

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
}
