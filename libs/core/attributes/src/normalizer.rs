// [libs/core/attributes/src/normalizer.rs]
//! `normalize(dataset, target_format) -> (dataset', stats)` (§4.4):
//! composes the six phases into a single pass over a `RawDataset`.

use std::collections::HashSet;

use geoconvert_domain_models::dataset::RawDataset;
use geoconvert_domain_models::format::OutputFormat;
use serde_json::Value;

use crate::naming::rename_columns;
use crate::stats::NormalizeStats;
use crate::text::{clean_text_value, is_null_token};
use crate::types::{infer_column_type, normalize_timestamp, CoercedType};

const GHOST_COLUMNS: &[&str] = &["fid", "objectid", "shape_area", "shape_length", "shape_leng"];

pub fn normalize(
    mut dataset: RawDataset,
    target_format: OutputFormat,
) -> (RawDataset, NormalizeStats) {
    let mut stats = NormalizeStats::default();
    let is_shapefile = target_format == OutputFormat::Shapefile;

    // Phase 1-2: rename and resolve collisions.
    let (renamed_columns, rename_map) = rename_columns(&dataset.column_order, is_shapefile);
    if !rename_map.is_empty() {
        for feature in &mut dataset.features {
            for (old, new) in &rename_map {
                if old != new {
                    if let Some(value) = feature.attributes.remove(old) {
                        feature.attributes.insert(new.clone(), value);
                    }
                }
            }
        }
        stats.columns_renamed = rename_map;
    }
    dataset.column_order = renamed_columns;

    // Phase 3: drop ghost columns.
    let dropped: Vec<String> = dataset
        .column_order
        .iter()
        .filter(|c| GHOST_COLUMNS.contains(&c.to_lowercase().as_str()))
        .cloned()
        .collect();
    if !dropped.is_empty() {
        let drop_set: HashSet<&String> = dropped.iter().collect();
        dataset.column_order.retain(|c| !drop_set.contains(c));
        for feature in &mut dataset.features {
            for col in &dropped {
                feature.attributes.remove(col);
            }
        }
        stats.columns_dropped = dropped;
    }

    // Phase 4: per-column type coercion.
    let mut text_columns: Vec<String> = Vec::new();
    for column in dataset.column_order.clone() {
        let string_values: Vec<&str> = dataset
            .features
            .iter()
            .filter_map(|f| match f.attributes.get(&column) {
                Some(Value::String(s)) => Some(s.as_str()),
                _ => None,
            })
            .collect();

        match infer_column_type(string_values.into_iter()) {
            CoercedType::Numeric => {
                for feature in &mut dataset.features {
                    if let Some(Value::String(s)) = feature.attributes.get(&column) {
                        if let Ok(n) = s.trim().parse::<f64>() {
                            if let Some(num) = serde_json::Number::from_f64(n) {
                                feature
                                    .attributes
                                    .insert(column.clone(), Value::Number(num));
                            }
                        }
                    }
                }
                stats
                    .type_conversions
                    .insert(column.clone(), CoercedType::Numeric.as_str().to_string());
            }
            CoercedType::Timestamp => {
                for feature in &mut dataset.features {
                    if let Some(Value::String(s)) = feature.attributes.get(&column) {
                        if let Some(normalized) = normalize_timestamp(s) {
                            feature.attributes.insert(column.clone(), Value::String(normalized));
                        }
                    }
                }
                stats
                    .type_conversions
                    .insert(column.clone(), CoercedType::Timestamp.as_str().to_string());
            }
            CoercedType::Text => {
                text_columns.push(column);
            }
        }
    }

    // Phase 5-6: text cleanup and null-token standardization, text columns only.
    let mut standardized = 0u64;
    for column in &text_columns {
        for feature in &mut dataset.features {
            let Some(Value::String(raw)) = feature.attributes.get(column).cloned() else {
                continue;
            };

            let cleaned = clean_text_value(&raw);
            match cleaned {
                None => {
                    feature.attributes.insert(column.clone(), Value::Null);
                }
                Some(s) => {
                    if is_null_token(&s) {
                        standardized += 1;
                        feature.attributes.insert(column.clone(), Value::Null);
                    } else {
                        feature.attributes.insert(column.clone(), Value::String(s));
                    }
                }
            }
        }
    }
    stats.null_values_standardized = standardized;

    (dataset, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoconvert_domain_models::dataset::{AttributeMap, RawFeature};
    use serde_json::json;

    fn feature(attrs: &[(&str, Value)]) -> RawFeature {
        let mut map = AttributeMap::new();
        for (k, v) in attrs {
            map.insert(k.to_string(), v.clone());
        }
        RawFeature::new(None, map)
    }

    #[test]
    fn numeric_column_is_coerced() {
        let dataset = RawDataset::new(
            vec![
                feature(&[("population", json!("100"))]),
                feature(&[("population", json!("250"))]),
            ],
            vec!["population".to_string()],
        );
        let (out, stats) = normalize(dataset, OutputFormat::GeoJson);
        assert_eq!(stats.type_conversions.get("population").unwrap(), "numeric");
        assert_eq!(out.features[0].attributes["population"], json!(100.0));
    }

    #[test]
    fn timestamp_column_is_reformatted_to_iso() {
        let dataset = RawDataset::new(
            vec![
                feature(&[("captured_at", json!("2024-06-15 10:30:00"))]),
                feature(&[("captured_at", json!("2024-01-01"))]),
            ],
            vec!["captured_at".to_string()],
        );
        let (out, stats) = normalize(dataset, OutputFormat::GeoJson);
        assert_eq!(stats.type_conversions.get("captured_at").unwrap(), "timestamp");
        assert_eq!(
            out.features[0].attributes["captured_at"],
            json!("2024-06-15T10:30:00")
        );
        assert_eq!(out.features[1].attributes["captured_at"], json!("2024-01-01"));
    }

    #[test]
    fn ghost_columns_are_dropped() {
        let dataset = RawDataset::new(
            vec![feature(&[("OBJECTID", json!("1")), ("nom", json!("Paris"))])],
            vec!["OBJECTID".to_string(), "nom".to_string()],
        );
        let (out, stats) = normalize(dataset, OutputFormat::GeoJson);
        assert_eq!(stats.columns_dropped, vec!["OBJECTID".to_string()]);
        assert!(!out.column_order.contains(&"OBJECTID".to_string()));
    }

    #[test]
    fn null_tokens_become_null() {
        let dataset = RawDataset::new(
            vec![feature(&[("remarque", json!("N/A"))])],
            vec!["remarque".to_string()],
        );
        let (out, stats) = normalize(dataset, OutputFormat::GeoJson);
        assert_eq!(stats.null_values_standardized, 1);
        assert_eq!(out.features[0].attributes["remarque"], Value::Null);
    }

    #[test]
    fn shapefile_target_keeps_names_within_ten_chars() {
        let dataset = RawDataset::new(
            vec![feature(&[("population_totale", json!("1"))])],
            vec!["population_totale".to_string()],
        );
        let (out, _stats) = normalize(dataset, OutputFormat::Shapefile);
        for name in &out.column_order {
            assert!(name.len() <= 10);
        }
    }
}
