// [libs/core/projection/src/reproject.rs]
//! Reprojection (§4.2) for the pipeline's in-memory `RawDataset`, plus the
//! Web-Mercator area estimate (§4.5) the quality report surfaces.

use gdal::spatial_ref::{CoordTransform, SpatialRef};
use gdal::vector::Geometry;
use geo::{Area, LineString, Polygon};
use geoconvert_domain_models::dataset::RawDataset;

use crate::error::ProjectionError;

/// EPSG:3857, the projection `_estimate_area_km2` reprojects into before
/// measuring area.
const WEB_MERCATOR_EPSG: u32 = 3857;

/// Transforms every feature in `dataset` from `source_epsg` to `target_epsg`
/// in place, operating directly on the `RawDataset`'s WKB geometries. This
/// is what the orchestrator (C7) calls, since the pipeline passes datasets
/// around as `RawDataset` rather than an open GDAL `Dataset` between
/// stages. Matches
/// `original_source/saas/backend/app/services/projection_detector.py::reproject_geodataframe`:
/// the source CRS is force-set (override-allowed) before transforming, so a
/// dataset with no or a wrong embedded CRS can still be corrected.
pub fn reproject_raw(
    dataset: &mut RawDataset,
    source_epsg: u32,
    target_epsg: u32,
) -> Result<(), ProjectionError> {
    if source_epsg == target_epsg {
        return Ok(());
    }

    let source_srs = SpatialRef::from_epsg(source_epsg)?;
    let target_srs = SpatialRef::from_epsg(target_epsg)?;
    let transform = CoordTransform::new(&source_srs, &target_srs)?;

    for feature in &mut dataset.features {
        let Some(wkb) = feature.geometry.as_deref() else {
            continue;
        };
        let mut geometry = Geometry::from_wkb(wkb)?;
        geometry.transform_inplace(&transform)?;
        feature.geometry = Some(geometry.wkb()?);
    }

    Ok(())
}

/// Reprojects a bounding box from `source_epsg` to Web Mercator and returns
/// its area in square kilometers, rounded to two decimal places. Mirrors
/// `original_source/saas/backend/app/services/quality_reporter.py::_estimate_area_km2`,
/// which reprojects the dataset to EPSG:3857 and divides the union's area by
/// 1e6; here the bbox stands in for the union since by report time the
/// pipeline has already discarded individual feature geometries in favor of
/// the roll-up stats the quality report is built from. Returns `None` if the
/// bbox is degenerate or the CRS transform fails, the same "can't estimate,
/// omit the field" behavior as the original's bare `except Exception`.
pub fn estimate_area_km2(min_x: f64, min_y: f64, max_x: f64, max_y: f64, source_epsg: u32) -> Option<f64> {
    if !(min_x < max_x && min_y < max_y) {
        return None;
    }

    let source_srs = SpatialRef::from_epsg(source_epsg).ok()?;
    let target_srs = SpatialRef::from_epsg(WEB_MERCATOR_EPSG).ok()?;
    let transform = CoordTransform::new(&source_srs, &target_srs).ok()?;

    let mut xs = [min_x, max_x, max_x, min_x];
    let mut ys = [min_y, min_y, max_y, max_y];
    let mut zs = [0.0_f64; 4];
    transform.transform_coords(&mut xs, &mut ys, &mut zs).ok()?;

    let ring: LineString<f64> = vec![
        (xs[0], ys[0]),
        (xs[1], ys[1]),
        (xs[2], ys[2]),
        (xs[3], ys[3]),
        (xs[0], ys[0]),
    ]
    .into();
    let polygon = Polygon::new(ring, vec![]);
    let area_km2 = polygon.unsigned_area() / 1_000_000.0;
    Some((area_km2 * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_bbox_yields_no_estimate() {
        assert_eq!(estimate_area_km2(10.0, 10.0, 10.0, 20.0, 4326), None);
        assert_eq!(estimate_area_km2(10.0, 20.0, 5.0, 25.0, 4326), None);
    }

    #[test]
    fn unknown_epsg_yields_no_estimate() {
        assert_eq!(estimate_area_km2(0.0, 0.0, 1.0, 1.0, 999_999), None);
    }

    #[test]
    fn small_wgs84_bbox_near_the_equator_gives_a_plausible_area() {
        // Roughly 0.01deg square straddling (0, 0); at the equator Web
        // Mercator is locally undistorted, so the area should land near
        // (111 km * 0.01)^2 ~= 1.23 km^2.
        let area = estimate_area_km2(-0.005, -0.005, 0.005, 0.005, 4326).expect("estimate");
        assert!(area > 0.5 && area < 3.0, "area {area} out of plausible range");
    }
}
