// [libs/domain/pipeline/src/orchestrator.rs]
//! `process(...)` (C7, §4.7): the fixed ten-stage conversion pipeline.
//! Ported from
//! `original_source/saas/backend/app/services/gdal_processor.py::GDALProcessor.process`.

use std::path::Path;
use std::time::Instant;

use geoconvert_core_formats::{extract_if_zip, package_if_needed, read_dataset, write_dataset, WriteOptions};
use geoconvert_core_geometry::{clean, dominant_geometry_type, CleanStats};
use geoconvert_core_attributes::{normalize, NormalizeStats};
use geoconvert_core_projection::{detect, estimate_area_km2, reproject_raw};
use geoconvert_core_quality::{generate, GenerateInput};
use geoconvert_domain_models::format::{Encoding, OutputFormat};
use tempfile::TempDir;
use tracing::info;

use crate::error::PipelineError;
use crate::result::ConversionResult;
use crate::summary::{column_stats, compute_bbox};

pub struct ProcessParams {
    pub output_format: OutputFormat,
    pub target_epsg: Option<u32>,
    pub fix_geometries: bool,
    pub normalize_attributes: bool,
    pub encoding: Encoding,
}

fn empty_clean_stats(total: u64) -> CleanStats {
    CleanStats {
        total_input: total,
        null_geometry: 0,
        invalid_before: 0,
        fixed: 0,
        unfixable: 0,
        duplicates_removed: 0,
        total_output: total,
        error_samples: Vec::new(),
    }
}

/// Runs the fixed ten-stage pipeline (§4.7) over a single input file,
/// returning the final artifact plus its full quality report.
pub fn process(input_path: &Path, params: ProcessParams) -> Result<ConversionResult, PipelineError> {
    if !input_path.exists() {
        return Err(PipelineError::MissingInput(
            input_path.display().to_string(),
        ));
    }

    let started = Instant::now();

    // Stage 1: extract archive if input is .zip.
    let (work_path, _zip_guard) = extract_if_zip(input_path)?;

    // Stage 2: detect source EPSG.
    let projection_info = detect(&work_path);
    let source_epsg = projection_info.detected_epsg;

    // Stage 3: read dataset with encoding + fallback.
    let dataset = read_dataset(&work_path, params.encoding)?;
    let columns_input = dataset.column_order.len() as u64;
    let features_input = dataset.len() as u64;

    // Stage 4: snapshot pre-cleanup dataset for the quality report.
    // (features_input/columns_input captured above serve as that snapshot;
    // cloning the whole dataset isn't needed since the reporter only
    // needs scalar counts from "before".)

    // Stage 5: clean geometries.
    let (dataset, geometry_stats) = if params.fix_geometries {
        clean(dataset)
    } else {
        let total = dataset.len() as u64;
        (dataset, empty_clean_stats(total))
    };

    // Stage 6: normalize attributes (DBF truncation depends on output_format).
    let (mut dataset, attribute_stats) = if params.normalize_attributes {
        normalize(dataset, params.output_format)
    } else {
        (dataset, NormalizeStats::default())
    };

    // Stage 7: reprojection policy.
    let effective_target_epsg = match (params.target_epsg, source_epsg) {
        (Some(target), Some(source)) if target != source => {
            reproject_raw(&mut dataset, source, target)?;
            Some(target)
        }
        (Some(target), _) => Some(target),
        (None, Some(source)) => Some(source),
        (None, None) => None,
    };

    // Stage 8: write to a temp path.
    let out_dir = TempDir::with_prefix("geoconvert_out_")?;
    let write_options = WriteOptions {
        output_format: params.output_format,
        encoding: params.encoding,
        target_epsg: effective_target_epsg,
    };
    let written_path = write_dataset(&dataset, out_dir.path(), &write_options)?;

    // Stage 9: package if multi-file.
    let final_path = package_if_needed(&written_path, params.output_format)?;

    let processing_time_seconds = started.elapsed().as_secs_f64();

    // Stage 10: generate quality report.
    let dominant_geometry = dominant_geometry_type(&dataset);
    let bbox = compute_bbox(&dataset);
    let columns = column_stats(&dataset, &attribute_stats);
    let feature_count = dataset.len() as u64;

    // Area is measured in whatever CRS the dataset holds at this point in
    // the pipeline (post stage-7 reprojection, if any), so that's the CRS
    // `estimate_area_km2` reprojects *from* on its way to EPSG:3857.
    let area_km2 = match (bbox, effective_target_epsg) {
        (Some(b), Some(epsg)) => estimate_area_km2(b.min_x, b.min_y, b.max_x, b.max_y, epsg),
        _ => None,
    };

    let quality_report = generate(GenerateInput {
        features_input,
        features_output: feature_count,
        columns_input,
        columns_output: dataset.column_order.len() as u64,
        dominant_geometry,
        bbox,
        area_km2,
        geometry_stats: geometry_stats.clone(),
        attribute_columns: columns,
        source_epsg,
        detection_method: projection_info.method.clone(),
        target_epsg: effective_target_epsg,
        processing_time_seconds,
    });

    info!(
        feature_count,
        score = quality_report.score,
        "conversion pipeline finished"
    );

    Ok(ConversionResult {
        output_path: final_path,
        output_format: params.output_format,
        input_feature_count: features_input,
        feature_count,
        dominant_geometry,
        source_epsg,
        target_epsg: effective_target_epsg,
        quality_report,
        geometry_stats,
        attribute_stats,
        processing_time_seconds,
    })
}
