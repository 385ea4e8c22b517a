// [libs/domain/pipeline/src/result.rs]

use std::path::PathBuf;

use geoconvert_core_attributes::NormalizeStats;
use geoconvert_core_geometry::CleanStats;
use geoconvert_domain_models::format::{GeometryKind, OutputFormat};
use geoconvert_domain_models::quality::QualityReport;

/// The full result of running `process` (§4.7).
pub struct ConversionResult {
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub input_feature_count: u64,
    pub feature_count: u64,
    pub dominant_geometry: GeometryKind,
    pub source_epsg: Option<u32>,
    pub target_epsg: Option<u32>,
    pub quality_report: QualityReport,
    pub geometry_stats: CleanStats,
    pub attribute_stats: NormalizeStats,
    pub processing_time_seconds: f64,
}
