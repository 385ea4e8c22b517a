// [libs/core/attributes/src/types.rs]
//! Phase 4 of the normalizer (§4.4): per-column type coercion.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static TIMESTAMP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}([ T]\d{2}:\d{2}:\d{2})?$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercedType {
    Numeric,
    Timestamp,
    Text,
}

impl CoercedType {
    pub fn as_str(self) -> &'static str {
        match self {
            CoercedType::Numeric => "numeric",
            CoercedType::Timestamp => "timestamp",
            CoercedType::Text => "text",
        }
    }
}

/// Decides a column's coerced type from its non-null string values. An
/// all-numeric column wins over an all-timestamp-shaped one, matching the
/// original's `pd.to_numeric` attempt preceding the datetime attempt.
pub fn infer_column_type<'a>(values: impl Iterator<Item = &'a str>) -> CoercedType {
    let values: Vec<&str> = values.collect();
    if values.is_empty() {
        return CoercedType::Text;
    }

    if values.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
        return CoercedType::Numeric;
    }

    if values.iter().all(|v| TIMESTAMP_PATTERN.is_match(v.trim())) {
        return CoercedType::Timestamp;
    }

    CoercedType::Text
}

/// Parses a value already confirmed to match [`TIMESTAMP_PATTERN`] and
/// reformats it to a canonical ISO 8601 string, matching the original's
/// `pd.to_datetime` coercion. Returns `None` for a value that matched the
/// shape but isn't a real calendar date (e.g. "2024-02-30"), the same
/// outcome as the original's caught `ValueError`.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_numeric_values_detected() {
        let values = vec!["1", "2.5", "-3"];
        assert_eq!(
            infer_column_type(values.into_iter()),
            CoercedType::Numeric
        );
    }

    #[test]
    fn all_dates_detected() {
        let values = vec!["2024-01-01", "2024-06-15 10:30:00"];
        assert_eq!(
            infer_column_type(values.into_iter()),
            CoercedType::Timestamp
        );
    }

    #[test]
    fn mixed_values_are_text() {
        let values = vec!["1", "abc"];
        assert_eq!(infer_column_type(values.into_iter()), CoercedType::Text);
    }

    #[test]
    fn empty_column_is_text() {
        assert_eq!(infer_column_type(std::iter::empty()), CoercedType::Text);
    }

    #[test]
    fn date_only_value_normalizes_unchanged() {
        assert_eq!(normalize_timestamp("2024-01-01"), Some("2024-01-01".to_string()));
    }

    #[test]
    fn space_separated_datetime_normalizes_to_iso_t() {
        assert_eq!(
            normalize_timestamp("2024-06-15 10:30:00"),
            Some("2024-06-15T10:30:00".to_string())
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize_timestamp("  2024-01-01  "), Some("2024-01-01".to_string()));
    }

    #[test]
    fn shape_matching_but_invalid_calendar_date_is_rejected() {
        assert_eq!(normalize_timestamp("2024-02-30"), None);
    }
}
