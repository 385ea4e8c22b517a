// [libs/domain/models/src/quality.rs]
//! The quality report shape produced by C5 (§4.5) and stored on
//! `JobOutcome::quality_report`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Letter grade derived from `QualityReport::score` (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// Confidence tag attached to CRS detection (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionConfidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInfo {
    pub detected_epsg: Option<u32>,
    pub confidence: DetectionConfidence,
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryQuality {
    pub input_count: u64,
    pub null_geometry_count: u64,
    pub invalid_before_repair: u64,
    pub unfixable_count: u64,
    pub duplicates_removed: u64,
    pub output_count: u64,
}

impl GeometryQuality {
    pub fn null_rate(&self) -> f64 {
        if self.input_count == 0 {
            0.0
        } else {
            self.null_geometry_count as f64 / self.input_count as f64
        }
    }

    pub fn validity_rate(&self) -> f64 {
        if self.input_count == 0 {
            1.0
        } else {
            let invalid = self.invalid_before_repair as f64;
            1.0 - invalid / self.input_count as f64
        }
    }
}

/// Per-column statistics gathered by the attribute normalizer (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStat {
    pub name: String,
    pub inferred_type: String,
    pub null_count: u64,
    pub distinct_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeQuality {
    pub columns: Vec<ColumnStat>,
    pub total_cells: u64,
    pub null_cells: u64,
}

impl AttributeQuality {
    pub fn completeness_rate(&self) -> f64 {
        if self.total_cells == 0 {
            1.0
        } else {
            1.0 - self.null_cells as f64 / self.total_cells as f64
        }
    }

    pub fn text_columns_over_threshold(&self, distinct_threshold: u64) -> u64 {
        self.columns
            .iter()
            .filter(|c| c.inferred_type == "text" && c.distinct_count > distinct_threshold)
            .count() as u64
    }
}

/// The full report attached to a successful job (§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub score: f64,
    pub grade: Grade,
    pub projection: ProjectionInfo,
    pub geometry: GeometryQuality,
    pub attributes: AttributeQuality,
    pub recommendations: Vec<String>,
    /// Free-form extras (e.g. per-geometry-type feature counts) that don't
    /// warrant their own field but are useful context for the client.
    pub extra: HashMap<String, serde_json::Value>,
}
