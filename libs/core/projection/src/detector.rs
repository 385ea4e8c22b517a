// [libs/core/projection/src/detector.rs]
//! `detect(path)` cascade (§4.2): driver metadata, then shapefile sidecar,
//! then an extent heuristic over the built-in CRS table.

use std::path::{Path, PathBuf};

use gdal::spatial_ref::SpatialRef;
use gdal::vector::LayerAccess;
use gdal::Dataset;
use geoconvert_domain_models::quality::{DetectionConfidence, ProjectionInfo};
use tracing::debug;

use crate::bbox::{best_containing_crs, Bounds};
use crate::error::ProjectionError;

const EXTENT_SAMPLE_SIZE: usize = 100;

/// Resolves the first EPSG authority code a spatial reference can identify,
/// running GDAL's auto-identify pass first.
fn identify_epsg(srs: &mut SpatialRef) -> Option<u32> {
    if srs.auto_identify_epsg().is_err() {
        return None;
    }
    srs.authority_code(None).ok().map(|code| code as u32)
}

/// Tier 1: ask the format driver for the layer's spatial reference.
fn detect_from_driver(path: &Path) -> Option<u32> {
    let dataset = Dataset::open(path).ok()?;
    let layer = dataset.layer(0).ok()?;
    let mut srs = layer.spatial_ref()?;
    identify_epsg(&mut srs)
}

/// Tier 2: shapefile inputs carry a sibling `.prj` WKT file.
fn detect_from_sidecar(path: &Path) -> Option<u32> {
    let prj_path: PathBuf = path.with_extension("prj");
    let wkt = std::fs::read_to_string(prj_path).ok()?;
    let mut srs = SpatialRef::from_wkt(&wkt).ok()?;
    identify_epsg(&mut srs)
}

/// Tier 3: compute the bounding box over the first `EXTENT_SAMPLE_SIZE`
/// features and pick the smallest built-in CRS bbox that contains it.
fn detect_from_extent(path: &Path) -> Result<Option<(u32, DetectionConfidence)>, ProjectionError> {
    let dataset = Dataset::open(path)?;
    let mut layer = dataset.layer(0)?;

    let mut bounds: Option<Bounds> = None;
    for feature in layer.features().take(EXTENT_SAMPLE_SIZE) {
        let Some(geometry) = feature.geometry() else {
            continue;
        };
        let envelope = geometry.envelope();
        match bounds.as_mut() {
            Some(b) => {
                b.extend(envelope.MinX, envelope.MinY);
                b.extend(envelope.MaxX, envelope.MaxY);
            }
            None => {
                bounds = Some(Bounds::new(
                    envelope.MinX,
                    envelope.MinY,
                    envelope.MaxX,
                    envelope.MaxY,
                ));
            }
        }
    }

    let Some(bounds) = bounds else {
        return Ok(None);
    };

    Ok(best_containing_crs(bounds).map(|epsg| (epsg, DetectionConfidence::Medium)))
}

/// Runs the full three-tier cascade; the first hit wins (§4.2).
pub fn detect(path: &Path) -> ProjectionInfo {
    if let Some(epsg) = detect_from_driver(path) {
        debug!(epsg, method = "driver", "CRS resolved from driver metadata");
        return ProjectionInfo {
            detected_epsg: Some(epsg),
            confidence: DetectionConfidence::High,
            method: Some("ogr_metadata".into()),
        };
    }

    if let Some(epsg) = detect_from_sidecar(path) {
        debug!(epsg, method = "sidecar", "CRS resolved from .prj sidecar");
        return ProjectionInfo {
            detected_epsg: Some(epsg),
            confidence: DetectionConfidence::High,
            method: Some("prj_file".into()),
        };
    }

    match detect_from_extent(path) {
        Ok(Some((epsg, confidence))) => {
            debug!(epsg, "CRS resolved from extent heuristic");
            ProjectionInfo {
                detected_epsg: Some(epsg),
                confidence,
                method: Some("extent_heuristic".into()),
            }
        }
        _ => ProjectionInfo {
            detected_epsg: None,
            confidence: DetectionConfidence::Low,
            method: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::Bounds;

    #[test]
    fn extent_bounds_accumulate_across_features() {
        let mut bounds = Bounds::new(600000.0, 6700000.0, 600000.0, 6700000.0);
        bounds.extend(601000.0, 6701000.0);
        assert_eq!(bounds.max_x, 601000.0);
        assert_eq!(bounds.max_y, 6701000.0);
        assert_eq!(best_containing_crs(bounds), Some(2154));
    }
}
