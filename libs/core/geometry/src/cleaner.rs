// [libs/core/geometry/src/cleaner.rs]
//! Five-phase cleaning pipeline (§4.3), ported from
//! `original_source/saas/backend/app/services/geometry_cleaner.py::GeometryCleaner.clean`.

use geos::{Geom, Geometry as GeosGeometry, WKBWriter};
use geoconvert_domain_models::dataset::{RawDataset, RawFeature};
use tracing::warn;

use crate::error::GeometryError;
use crate::stats::{CleanStats, InvalidSample};

const MAX_ERROR_SAMPLES: usize = 10;

fn parse(wkb: &[u8]) -> Option<GeosGeometry> {
    GeosGeometry::new_from_wkb(wkb).ok()
}

fn to_wkb(geometry: &GeosGeometry) -> Result<Vec<u8>, GeometryError> {
    let mut writer = WKBWriter::new()?;
    Ok(writer.write_wkb(geometry)?.as_ref().to_vec())
}

/// Runs the full pipeline. Never fails outright: a geometry GEOS cannot even
/// parse is treated the same as an unfixable invalid geometry, since the
/// job must still complete for the rest of the dataset.
pub fn clean(dataset: RawDataset) -> (RawDataset, CleanStats) {
    let total_input = dataset.features.len() as u64;
    let mut stats = CleanStats {
        total_input,
        null_geometry: 0,
        invalid_before: 0,
        fixed: 0,
        unfixable: 0,
        duplicates_removed: 0,
        total_output: 0,
        error_samples: Vec::new(),
    };

    // Phase 1: drop null geometry.
    let non_null: Vec<(usize, RawFeature)> = dataset
        .features
        .into_iter()
        .enumerate()
        .filter(|(_, f)| {
            if f.geometry.is_none() {
                stats.null_geometry += 1;
                false
            } else {
                true
            }
        })
        .collect();

    // Phase 2: validity pass + error sample collection.
    let mut after_repair: Vec<RawFeature> = Vec::with_capacity(non_null.len());
    for (index, feature) in non_null {
        let wkb = feature.geometry.as_deref().unwrap_or_default();
        let Some(geom) = parse(wkb) else {
            stats.invalid_before += 1;
            if stats.error_samples.len() < MAX_ERROR_SAMPLES {
                stats.error_samples.push(InvalidSample {
                    index,
                    reason: "unparseable geometry".into(),
                });
            }
            stats.unfixable += 1;
            continue;
        };

        let is_valid = geom.is_valid();
        if is_valid {
            after_repair.push(feature);
            continue;
        }

        stats.invalid_before += 1;
        if stats.error_samples.len() < MAX_ERROR_SAMPLES {
            let reason = geom
                .is_valid_reason()
                .unwrap_or_else(|_| "invalid geometry".to_string());
            stats.error_samples.push(InvalidSample { index, reason });
        }

        // Phase 3: attempt make-valid repair.
        match geom.make_valid() {
            Ok(repaired) if !repaired.is_empty().unwrap_or(true) => {
                match to_wkb(&repaired) {
                    Ok(wkb) => {
                        after_repair.push(RawFeature::new(Some(wkb), feature.attributes));
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to serialize repaired geometry");
                        stats.unfixable += 1;
                    }
                }
            }
            Ok(_) => {
                // Empty repair result: unfixable (phase 4 will drop it, but
                // it never carried a geometry forward so drop here).
                stats.unfixable += 1;
            }
            Err(e) => {
                warn!(error = %e, "make-valid repair failed");
                stats.unfixable += 1;
            }
        }
    }
    stats.fixed = stats.invalid_before - stats.unfixable;

    // Phase 4 is folded into phase 3/2 above: only surviving, non-empty
    // geometries reached `after_repair`.

    // Phase 5: byte-equal dedup, first wins; reset indexing.
    let mut seen: Vec<&[u8]> = Vec::with_capacity(after_repair.len());
    let mut deduped: Vec<RawFeature> = Vec::with_capacity(after_repair.len());
    for feature in &after_repair {
        let wkb = feature.geometry.as_deref().unwrap_or_default();
        if seen.iter().any(|s| *s == wkb) {
            stats.duplicates_removed += 1;
            continue;
        }
        seen.push(wkb);
        deduped.push(feature.clone());
    }

    stats.total_output = deduped.len() as u64;

    (
        RawDataset::new(deduped, dataset.column_order),
        stats,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoconvert_domain_models::dataset::AttributeMap;

    fn point_wkb(x: f64, y: f64) -> Vec<u8> {
        let geom = GeosGeometry::new_from_wkt(&format!("POINT({x} {y})")).unwrap();
        to_wkb(&geom).unwrap()
    }

    fn feature(geometry: Option<Vec<u8>>) -> RawFeature {
        RawFeature::new(geometry, AttributeMap::new())
    }

    #[test]
    fn conservation_invariant_holds() {
        let dataset = RawDataset::new(
            vec![
                feature(Some(point_wkb(1.0, 1.0))),
                feature(Some(point_wkb(1.0, 1.0))), // duplicate
                feature(None),                       // null
            ],
            vec![],
        );
        let (_out, stats) = clean(dataset);
        assert!(stats.check_conservation());
        assert_eq!(stats.null_geometry, 1);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.total_output, 1);
    }

    #[test]
    fn distinct_points_survive_untouched() {
        let dataset = RawDataset::new(
            vec![
                feature(Some(point_wkb(1.0, 1.0))),
                feature(Some(point_wkb(2.0, 2.0))),
            ],
            vec![],
        );
        let (out, stats) = clean(dataset);
        assert_eq!(stats.total_output, 2);
        assert_eq!(out.features.len(), 2);
        assert!(stats.check_conservation());
    }

    proptest::proptest! {
        #[test]
        fn conservation_holds_for_arbitrary_null_and_duplicate_mixes(
            is_null in proptest::collection::vec(proptest::bool::ANY, 0..30),
            coord_bucket in proptest::collection::vec(0u8..5, 0..30),
        ) {
            // Zip the two vectors by index, truncating to the shorter length,
            // so every feature is either null or a point drawn from a small
            // bucket of coordinates (forcing frequent duplicates).
            let features: Vec<RawFeature> = is_null
                .iter()
                .zip(coord_bucket.iter())
                .map(|(&null, &bucket)| {
                    if null {
                        feature(None)
                    } else {
                        feature(Some(point_wkb(f64::from(bucket), f64::from(bucket))))
                    }
                })
                .collect();
            let total_input = features.len() as u64;

            let dataset = RawDataset::new(features, vec![]);
            let (out, stats) = clean(dataset);

            prop_assert!(stats.check_conservation());
            prop_assert_eq!(stats.total_input, total_input);
            prop_assert_eq!(stats.total_output, out.features.len() as u64);
            prop_assert!(stats.total_output <= stats.total_input);
        }
    }
}
