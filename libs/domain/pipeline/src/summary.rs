// [libs/domain/pipeline/src/summary.rs]
//! Post-processing helpers that turn a finished `RawDataset` into the
//! inputs the quality reporter (C5) needs: per-column stats and a bbox.

use std::collections::HashSet;

use gdal::vector::Geometry;
use geoconvert_core_attributes::NormalizeStats;
use geoconvert_core_quality::Bbox;
use geoconvert_domain_models::dataset::RawDataset;
use geoconvert_domain_models::quality::ColumnStat;
use serde_json::Value;

pub fn column_stats(dataset: &RawDataset, attribute_stats: &NormalizeStats) -> Vec<ColumnStat> {
    dataset
        .column_order
        .iter()
        .map(|column| {
            let mut null_count = 0u64;
            let mut distinct: HashSet<String> = HashSet::new();
            for feature in &dataset.features {
                match feature.attributes.get(column) {
                    None | Some(Value::Null) => null_count += 1,
                    Some(v) => {
                        distinct.insert(v.to_string());
                    }
                }
            }
            let inferred_type = attribute_stats
                .type_conversions
                .get(column)
                .cloned()
                .unwrap_or_else(|| "text".to_string());

            ColumnStat {
                name: column.clone(),
                inferred_type,
                null_count,
                distinct_count: distinct.len() as u64,
            }
        })
        .collect()
}

/// Axis-aligned bounding box over every feature's geometry, if any has one.
pub fn compute_bbox(dataset: &RawDataset) -> Option<Bbox> {
    let mut bbox: Option<Bbox> = None;
    for feature in &dataset.features {
        let Some(wkb) = feature.geometry.as_deref() else {
            continue;
        };
        let Ok(geom) = Geometry::from_wkb(wkb) else {
            continue;
        };
        let envelope = geom.envelope();
        bbox = Some(match bbox {
            None => Bbox {
                min_x: envelope.MinX,
                min_y: envelope.MinY,
                max_x: envelope.MaxX,
                max_y: envelope.MaxY,
            },
            Some(mut b) => {
                b.min_x = b.min_x.min(envelope.MinX);
                b.min_y = b.min_y.min(envelope.MinY);
                b.max_x = b.max_x.max(envelope.MaxX);
                b.max_y = b.max_y.max(envelope.MaxY);
                b
            }
        });
    }
    bbox
}
