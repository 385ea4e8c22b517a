// [libs/core/geometry/src/error.rs]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("geos error: {0}")]
    Geos(#[from] geos::Error),
}
