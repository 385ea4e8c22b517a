// [libs/core/attributes/src/naming.rs]
//! Phases 1-2 of the normalizer (§4.4): column renaming and collision
//! resolution. Ported from
//! `original_source/saas/backend/app/services/attribute_normalizer.py::_clean_column_name`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const SHAPEFILE_NAME_LIMIT: usize = 10;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_]").unwrap());
static MULTI_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// Steps (a)-(d) and, when `truncate` is set, (e): NFKD-to-ASCII, lowercase,
/// non-alnum -> underscore, collapse/strip underscores, `col_` prefix if
/// leading digit, truncate for shapefile targets, empty -> `col`.
fn clean_one(name: &str, truncate: bool) -> String {
    let ascii: String = name.nfkd().filter(|c| c.is_ascii()).collect();
    let lowered = ascii.to_lowercase();
    let underscored = NON_ALNUM.replace_all(&lowered, "_");
    let collapsed = MULTI_UNDERSCORE.replace_all(&underscored, "_");
    let trimmed = collapsed.trim_matches('_').to_string();

    let prefixed = match trimmed.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("col_{trimmed}"),
        _ => trimmed,
    };

    let truncated = if truncate && prefixed.len() > SHAPEFILE_NAME_LIMIT {
        prefixed.chars().take(SHAPEFILE_NAME_LIMIT).collect()
    } else {
        prefixed
    };

    if truncated.is_empty() {
        "col".to_string()
    } else {
        truncated
    }
}

/// Appends `_1`, `_2`, ... to duplicate names in first-appearance order.
///
/// When `truncate` is set the suffix must still fit within the 10-char DBF
/// limit, so a collision's *base* is shortened to make room for its
/// suffix (rather than truncating the already-suffixed string, which would
/// strip the suffix back off and reintroduce the very collision it was
/// meant to resolve).
fn dedupe_names(names: Vec<String>, truncate: bool) -> Vec<String> {
    let mut seen: HashMap<String, u32> = HashMap::new();
    let mut final_names: Vec<String> = Vec::with_capacity(names.len());

    for name in &names {
        let occurrence = *seen.get(name).unwrap_or(&0);
        seen.insert(name.clone(), occurrence + 1);

        let candidate = if occurrence == 0 {
            name.clone()
        } else {
            let suffix = format!("_{occurrence}");
            if truncate && name.len() + suffix.len() > SHAPEFILE_NAME_LIMIT {
                let base_budget = SHAPEFILE_NAME_LIMIT.saturating_sub(suffix.len());
                let base: String = name.chars().take(base_budget).collect();
                format!("{base}{suffix}")
            } else {
                format!("{name}{suffix}")
            }
        };

        // A truncated, re-suffixed candidate could in principle still
        // collide with a name already assigned; resolve that with the
        // same occurrence-counting scheme applied to the final list.
        let mut resolved = candidate.clone();
        let mut bump = 0u32;
        while final_names.contains(&resolved) {
            bump += 1;
            let suffix = format!("_{bump}");
            resolved = if truncate && candidate.len() + suffix.len() > SHAPEFILE_NAME_LIMIT {
                let base_budget = SHAPEFILE_NAME_LIMIT.saturating_sub(suffix.len());
                let base: String = candidate.chars().take(base_budget).collect();
                format!("{base}{suffix}")
            } else {
                format!("{candidate}{suffix}")
            };
        }

        final_names.push(resolved);
    }

    final_names
}

/// Renames every non-geometry column and resolves collisions, returning
/// the final names in the same order as `original_names`, plus the
/// rename map restricted to names that actually changed.
pub fn rename_columns(
    original_names: &[String],
    target_format_is_shapefile: bool,
) -> (Vec<String>, HashMap<String, String>) {
    let cleaned: Vec<String> = original_names
        .iter()
        .map(|n| clean_one(n, target_format_is_shapefile))
        .collect();

    let final_names = dedupe_names(cleaned, target_format_is_shapefile);

    let rename_map = original_names
        .iter()
        .zip(final_names.iter())
        .filter(|(old, new)| old.as_str() != new.as_str())
        .map(|(old, new)| (old.clone(), new.clone()))
        .collect();

    (final_names, rename_map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_replaces_punctuation() {
        assert_eq!(clean_one("Nom Commune", false), "nom_commune");
    }

    #[test]
    fn collapses_and_trims_underscores() {
        assert_eq!(clean_one("  a__b  ", false), "a_b");
    }

    #[test]
    fn prefixes_leading_digit() {
        assert_eq!(clean_one("2024_value", false), "col_2024_value");
    }

    #[test]
    fn empty_becomes_col() {
        assert_eq!(clean_one("___", false), "col");
    }

    #[test]
    fn shapefile_target_truncates_to_ten() {
        assert_eq!(clean_one("population_totale", true), "population");
    }

    #[test]
    fn collisions_get_numbered_suffixes() {
        let names = vec!["Nom".to_string(), "nom".to_string(), "NOM".to_string()];
        let (final_names, _) = rename_columns(&names, false);
        assert_eq!(final_names, vec!["nom", "nom_1", "nom_2"]);
    }

    #[test]
    fn shapefile_names_stay_unique_and_within_limit() {
        let names = vec![
            "population_totale_homme".to_string(),
            "population_totale_femme".to_string(),
        ];
        let (final_names, _) = rename_columns(&names, true);
        for n in &final_names {
            assert!(n.len() <= SHAPEFILE_NAME_LIMIT);
        }
        let unique: std::collections::HashSet<_> = final_names.iter().collect();
        assert_eq!(unique.len(), final_names.len());
    }

    proptest::proptest! {
        #[test]
        fn shapefile_rename_always_stays_unique_and_within_limit(
            raw_names in proptest::collection::vec("[A-Za-z0-9 _-]{0,20}", 0..12),
        ) {
            let (final_names, _) = rename_columns(&raw_names, true);

            for n in &final_names {
                prop_assert!(n.len() <= SHAPEFILE_NAME_LIMIT);
                prop_assert!(!n.is_empty());
            }
            let unique: std::collections::HashSet<_> = final_names.iter().collect();
            prop_assert_eq!(unique.len(), final_names.len());
            prop_assert_eq!(final_names.len(), raw_names.len());
        }

        #[test]
        fn non_shapefile_rename_preserves_count_and_uniqueness(
            raw_names in proptest::collection::vec("[A-Za-z0-9 _-]{0,20}", 0..12),
        ) {
            let (final_names, _) = rename_columns(&raw_names, false);

            prop_assert_eq!(final_names.len(), raw_names.len());
            let unique: std::collections::HashSet<_> = final_names.iter().collect();
            prop_assert_eq!(unique.len(), final_names.len());
        }
    }
}
