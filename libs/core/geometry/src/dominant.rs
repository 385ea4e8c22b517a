// [libs/core/geometry/src/dominant.rs]
//! `dominant_geometry_type(dataset) -> tag` (§4.3): most frequent geometry
//! kind, or "Unknown" if the dataset is empty.

use std::collections::HashMap;

use geos::{GGeomType, Geom, Geometry as GeosGeometry};
use geoconvert_domain_models::dataset::RawDataset;
use geoconvert_domain_models::format::GeometryKind;

fn to_kind(t: GGeomType) -> GeometryKind {
    match t {
        GGeomType::Point => GeometryKind::Point,
        GGeomType::MultiPoint => GeometryKind::MultiPoint,
        GGeomType::LineString | GGeomType::LinearRing => GeometryKind::LineString,
        GGeomType::MultiLineString => GeometryKind::MultiLineString,
        GGeomType::Polygon => GeometryKind::Polygon,
        GGeomType::MultiPolygon => GeometryKind::MultiPolygon,
        _ => GeometryKind::Unknown,
    }
}

pub fn dominant_geometry_type(dataset: &RawDataset) -> GeometryKind {
    let mut counts: HashMap<GeometryKind, u64> = HashMap::new();

    for feature in &dataset.features {
        let Some(wkb) = feature.geometry.as_deref() else {
            continue;
        };
        let Ok(geom) = GeosGeometry::new_from_wkb(wkb) else {
            continue;
        };
        let Ok(gtype) = geom.geometry_type() else {
            continue;
        };
        *counts.entry(to_kind(gtype)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(kind, _)| kind)
        .unwrap_or(GeometryKind::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoconvert_domain_models::dataset::{AttributeMap, RawFeature};

    #[test]
    fn empty_dataset_is_unknown() {
        let dataset = RawDataset::new(vec![], vec![]);
        assert_eq!(dominant_geometry_type(&dataset), GeometryKind::Unknown);
    }

    #[test]
    fn most_frequent_kind_wins() {
        let point = GeosGeometry::new_from_wkt("POINT(1 1)").unwrap();
        let mut writer = geos::WKBWriter::new().unwrap();
        let wkb = writer.write_wkb(&point).unwrap().as_ref().to_vec();

        let dataset = RawDataset::new(
            vec![
                RawFeature::new(Some(wkb.clone()), AttributeMap::new()),
                RawFeature::new(Some(wkb), AttributeMap::new()),
            ],
            vec![],
        );
        assert_eq!(dominant_geometry_type(&dataset), GeometryKind::Point);
    }
}
