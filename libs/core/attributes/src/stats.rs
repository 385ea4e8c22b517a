// [libs/core/attributes/src/stats.rs]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// original column name -> final column name, only entries that changed.
    pub columns_renamed: HashMap<String, String>,
    pub columns_dropped: Vec<String>,
    /// final column name -> coerced type ("numeric" | "timestamp").
    pub type_conversions: HashMap<String, String>,
    pub null_values_standardized: u64,
}
