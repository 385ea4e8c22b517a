// [libs/core/formats/src/read.rs]
//! `read` (§4.6): open a file with an encoding hint, falling back to
//! latin-1 on failure, and expose it as a `RawDataset`.

use std::path::Path;

use gdal::vector::{Feature, FieldValue, LayerAccess};
use gdal::{Dataset, DatasetOptions};
use geoconvert_domain_models::dataset::{AttributeMap, RawDataset, RawFeature};
use geoconvert_domain_models::format::Encoding;
use serde_json::Value;
use tracing::warn;

use crate::error::FormatError;

fn open_with_encoding(path: &Path, encoding: Encoding) -> Result<Dataset, FormatError> {
    let option = format!("ENCODING={}", encoding.as_str());
    let open_options = [option.as_str()];
    let options = DatasetOptions {
        open_options: Some(&open_options),
        ..Default::default()
    };
    Dataset::open_ex(path, options).map_err(FormatError::from)
}

fn field_value_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::IntegerValue(v) => Value::from(v),
        FieldValue::Integer64Value(v) => Value::from(v),
        FieldValue::RealValue(v) => Value::from(v),
        FieldValue::StringValue(v) => Value::String(v),
        FieldValue::IntegerListValue(v) => Value::from(v),
        FieldValue::Integer64ListValue(v) => Value::from(v),
        FieldValue::RealListValue(v) => Value::from(v),
        FieldValue::StringListValue(v) => Value::from(v),
        FieldValue::DateValue(v) => Value::String(v.to_string()),
        FieldValue::DateTimeValue(v) => Value::String(v.to_rfc3339()),
    }
}

fn feature_attributes(feature: &Feature, column_order: &[String]) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    for name in column_order {
        let value = match feature.field(name) {
            Ok(Some(v)) => field_value_to_json(v),
            Ok(None) => Value::Null,
            Err(e) => {
                warn!(field = %name, error = %e, "failed to read field value");
                Value::Null
            }
        };
        attributes.insert(name.clone(), value);
    }
    attributes
}

/// Reads the first layer of `path` into a `RawDataset`. Tries `encoding`
/// first; on any failure (unreadable header, driver rejecting the open
/// option) retries once with latin-1, matching the original's bare
/// `try/except` fallback.
pub fn read_dataset(path: &Path, encoding: Encoding) -> Result<RawDataset, FormatError> {
    let dataset = match open_with_encoding(path, encoding) {
        Ok(d) => d,
        Err(_) if encoding != Encoding::Latin1 => open_with_encoding(path, Encoding::Latin1)?,
        Err(e) => return Err(e),
    };

    let mut layer = dataset.layer(0)?;
    let column_order: Vec<String> = layer
        .defn()
        .fields()
        .map(|f| f.name().to_string())
        .collect();

    let mut features = Vec::new();
    for feature in layer.features() {
        let attributes = feature_attributes(&feature, &column_order);
        let geometry = feature.geometry().map(|g| g.wkb()).transpose()?;
        features.push(RawFeature::new(geometry, attributes));
    }

    Ok(RawDataset::new(features, column_order))
}
