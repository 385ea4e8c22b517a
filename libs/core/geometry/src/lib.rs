// [libs/core/geometry/src/lib.rs]
//! Geometry validity cleaning and dominant-type inference (C3, §4.3).

pub mod cleaner;
pub mod dominant;
pub mod error;
pub mod stats;

pub use cleaner::clean;
pub use dominant::dominant_geometry_type;
pub use error::GeometryError;
pub use stats::{CleanStats, InvalidSample};
