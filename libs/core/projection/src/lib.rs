// [libs/core/projection/src/lib.rs]
//! CRS detection cascade and reprojection (C2, §4.2).

pub mod bbox;
pub mod detector;
pub mod error;
pub mod reproject;

pub use bbox::{best_containing_crs, Bounds, KNOWN_CRS_BBOXES};
pub use detector::detect;
pub use error::ProjectionError;
pub use reproject::{estimate_area_km2, reproject_raw};
