// [libs/core/quality/src/reporter.rs]
//! `generate(...)` (§4.5): assembles the full quality report document.

use std::collections::HashMap;

use geoconvert_core_geometry::CleanStats;
use geoconvert_domain_models::format::GeometryKind;
use geoconvert_domain_models::quality::{
    AttributeQuality, ColumnStat, DetectionConfidence, GeometryQuality, ProjectionInfo,
    QualityReport,
};
use serde_json::{json, Value};

use crate::score::compute_score;

/// A dataset's bounding box, carried alongside its estimated area.
#[derive(Debug, Clone, Copy)]
pub struct Bbox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Everything the reporter needs, gathered by the orchestrator (C7) as it
/// runs C2-C4 over a dataset.
pub struct GenerateInput {
    pub features_input: u64,
    pub features_output: u64,
    pub columns_input: u64,
    pub columns_output: u64,
    pub dominant_geometry: GeometryKind,
    pub bbox: Option<Bbox>,
    pub area_km2: Option<f64>,
    pub geometry_stats: CleanStats,
    pub attribute_columns: Vec<ColumnStat>,
    pub source_epsg: Option<u32>,
    pub detection_method: Option<String>,
    pub target_epsg: Option<u32>,
    pub processing_time_seconds: f64,
}

pub fn generate(input: GenerateInput) -> QualityReport {
    let geometry = GeometryQuality {
        input_count: input.geometry_stats.total_input,
        null_geometry_count: input.geometry_stats.null_geometry,
        invalid_before_repair: input.geometry_stats.invalid_before,
        unfixable_count: input.geometry_stats.unfixable,
        duplicates_removed: input.geometry_stats.duplicates_removed,
        output_count: input.geometry_stats.total_output,
    };

    let total_cells = input.attribute_columns.len() as u64 * input.features_output;
    let null_cells = input.attribute_columns.iter().map(|c| c.null_count).sum();
    let attributes = AttributeQuality {
        columns: input.attribute_columns,
        total_cells,
        null_cells,
    };

    let score_result = compute_score(&geometry, &attributes, input.source_epsg);

    let reprojected = match (input.source_epsg, input.target_epsg) {
        (Some(s), Some(t)) => s != t,
        _ => false,
    };

    let projection = ProjectionInfo {
        detected_epsg: input.source_epsg,
        confidence: if input.source_epsg.is_some() {
            DetectionConfidence::High
        } else {
            DetectionConfidence::Low
        },
        method: input.detection_method,
    };

    let mut extra: HashMap<String, Value> = HashMap::new();
    extra.insert(
        "summary".into(),
        json!({
            "features_input": input.features_input,
            "features_output": input.features_output,
            "features_lost": input.features_input.saturating_sub(input.features_output),
            "columns_input": input.columns_input,
            "columns_output": input.columns_output,
            "dominant_geometry_type": input.dominant_geometry.as_str(),
        }),
    );
    extra.insert(
        "target_epsg".into(),
        json!(input.target_epsg),
    );
    extra.insert("reprojected".into(), json!(reprojected));
    extra.insert(
        "processing_time_seconds".into(),
        json!((input.processing_time_seconds * 100.0).round() / 100.0),
    );
    if let Some(bbox) = input.bbox {
        extra.insert(
            "bbox".into(),
            json!([bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y]),
        );
        let area = (bbox.max_x - bbox.min_x) * (bbox.max_y - bbox.min_y);
        if area > 0.0 {
            extra.insert(
                "feature_density".into(),
                json!((input.features_output as f64 / area * 10000.0).round() / 10000.0),
            );
        }
    }
    if let Some(area_km2) = input.area_km2 {
        extra.insert("area_km2".into(), json!(area_km2));
    }

    QualityReport {
        score: score_result.score,
        grade: score_result.grade,
        projection,
        geometry,
        attributes,
        recommendations: score_result.recommendations,
        extra,
    }
}
