// [libs/core/attributes/src/text.rs]
//! Phases 5-6 of the normalizer (§4.4): text cleanup and null-token
//! standardization.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use unicode_general_category::{get_general_category, GeneralCategory};

static NULL_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["", "null", "none", "n/a", "na", "#n/a", "nan", "-", "--"]
        .into_iter()
        .collect()
});

fn is_control(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

/// Phase 5: trim whitespace and strip Unicode category-C characters. An
/// empty result becomes `None`.
pub fn clean_text_value(value: &str) -> Option<String> {
    let stripped: String = value.trim().chars().filter(|c| !is_control(*c)).collect();
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Phase 6: whether `value`'s trimmed, lowercased form is a recognized
/// null token.
pub fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(value.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_keeps_plain_text() {
        assert_eq!(clean_text_value("  Paris  "), Some("Paris".to_string()));
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(clean_text_value("Pa\u{0007}ris"), Some("Paris".to_string()));
    }

    #[test]
    fn whitespace_only_becomes_none() {
        assert_eq!(clean_text_value("   "), None);
    }

    #[test]
    fn recognizes_null_tokens_case_insensitively() {
        for token in ["", "NULL", "N/A", "na", "#n/a", "NaN", "-", "--"] {
            assert!(is_null_token(token), "expected {token:?} to be a null token");
        }
        assert!(!is_null_token("Paris"));
    }
}
