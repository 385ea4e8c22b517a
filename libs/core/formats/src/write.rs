// [libs/core/formats/src/write.rs]
//! `write` (§4.6): writes a `RawDataset` to a new file in the target
//! format. CSV output drops the geometry column in favor of `latitude`/
//! `longitude` centroid columns; KML uses the fiona-equivalent engine
//! (OGR's own KML driver, the closest available analogue).

use std::path::{Path, PathBuf};

use gdal::vector::{FieldValue, Geometry, LayerAccess, LayerOptions, OGRFieldType};
use gdal::spatial_ref::SpatialRef;
use gdal::DriverManager;
use geoconvert_domain_models::dataset::RawDataset;
use geoconvert_domain_models::format::{Encoding, OutputFormat};
use serde_json::Value;

use crate::error::FormatError;

fn json_field_type(value: &Value) -> OGRFieldType::Type {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => OGRFieldType::OFTInteger64,
        Value::Number(_) => OGRFieldType::OFTReal,
        _ => OGRFieldType::OFTString,
    }
}

fn json_to_field_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(FieldValue::IntegerValue(*b as i32)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(FieldValue::Integer64Value(i))
            } else {
                Some(FieldValue::RealValue(n.as_f64().unwrap_or(0.0)))
            }
        }
        Value::String(s) => Some(FieldValue::StringValue(s.clone())),
        other => Some(FieldValue::StringValue(other.to_string())),
    }
}

/// Best-effort centroid of a WKB geometry, used for CSV's `latitude`/
/// `longitude` columns.
fn centroid(wkb: &[u8]) -> Option<(f64, f64)> {
    let geom = Geometry::from_wkb(wkb).ok()?;
    let centroid = geom.get_centroid().ok()?;
    let (x, y, _) = centroid.get_point(0);
    Some((y, x))
}

pub struct WriteOptions {
    pub output_format: OutputFormat,
    pub encoding: Encoding,
    pub target_epsg: Option<u32>,
}

/// Writes `dataset` to a fresh temp path in `options.output_format`,
/// returning the path written.
pub fn write_dataset(
    dataset: &RawDataset,
    out_dir: &Path,
    options: &WriteOptions,
) -> Result<PathBuf, FormatError> {
    let output_path = out_dir.join(format!(
        "geoconvert_out{}",
        options.output_format.extension()
    ));

    let driver = DriverManager::get_driver_by_name(options.output_format.ogr_driver())?;
    let mut dataset_out = driver.create_vector_only(&output_path)?;

    let srs = options
        .target_epsg
        .and_then(|epsg| SpatialRef::from_epsg(epsg).ok());

    let is_csv = options.output_format == OutputFormat::Csv;

    let mut columns = dataset.column_order.clone();
    if is_csv {
        columns.push("latitude".to_string());
        columns.push("longitude".to_string());
    }

    let mut layer = dataset_out.create_layer(LayerOptions {
        name: "layer",
        srs: srs.as_ref(),
        options: Some(&[("ENCODING", options.encoding.as_str())]),
        ..Default::default()
    })?;

    for column in &columns {
        let field_type = dataset
            .features
            .iter()
            .find_map(|f| f.attributes.get(column))
            .map(json_field_type)
            .unwrap_or(OGRFieldType::OFTString);
        layer.create_defn_fields(&[(column, field_type)])?;
    }

    for feature in &dataset.features {
        let mut field_names: Vec<&str> = Vec::new();
        let mut field_values: Vec<FieldValue> = Vec::new();

        for column in &dataset.column_order {
            if let Some(value) = feature.attributes.get(column) {
                if let Some(fv) = json_to_field_value(value) {
                    field_names.push(column.as_str());
                    field_values.push(fv);
                }
            }
        }

        let geometry = if is_csv {
            None
        } else {
            feature
                .geometry
                .as_deref()
                .and_then(|wkb| Geometry::from_wkb(wkb).ok())
        };

        if is_csv {
            if let Some((lat, lon)) = feature.geometry.as_deref().and_then(centroid) {
                field_names.push("latitude");
                field_values.push(FieldValue::RealValue(lat));
                field_names.push("longitude");
                field_values.push(FieldValue::RealValue(lon));
            }
        }

        layer.create_feature_fields(geometry, &field_names, &field_values)?;
    }

    Ok(output_path)
}
