// [libs/domain/models/src/dataset.rs]
//! The in-memory dataset shape the pipeline stages (C3/C4/C6/C7) pass
//! between each other. Geometry travels as WKB so the geometry cleaner,
//! the attribute normalizer and the format driver layer can all operate on
//! it without agreeing on a single geometry library's native type.

use serde::{Deserialize, Serialize};

pub type AttributeMap = serde_json::Map<String, serde_json::Value>;

/// One row: an optional geometry (WKB-encoded) plus its attribute values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFeature {
    pub geometry: Option<Vec<u8>>,
    pub attributes: AttributeMap,
}

impl RawFeature {
    pub fn new(geometry: Option<Vec<u8>>, attributes: AttributeMap) -> Self {
        Self {
            geometry,
            attributes,
        }
    }
}

/// A full in-memory dataset: an ordered feature list plus the column names
/// observed across them, in first-appearance order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDataset {
    pub features: Vec<RawFeature>,
    pub column_order: Vec<String>,
}

impl RawDataset {
    pub fn new(features: Vec<RawFeature>, column_order: Vec<String>) -> Self {
        Self {
            features,
            column_order,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
