// [libs/core/quality/src/score.rs]
//! The weighted 0-100 score (§4.5). Ported from
//! `original_source/saas/backend/app/services/quality_reporter.py::QualityReporter._compute_score`.

use geoconvert_domain_models::quality::{AttributeQuality, GeometryQuality, Grade};

const TEXT_DISTINCT_THRESHOLD: u64 = 50;

pub struct ScoreResult {
    pub score: f64,
    pub grade: Grade,
    pub recommendations: Vec<String>,
}

pub fn compute_score(
    geometry: &GeometryQuality,
    attributes: &AttributeQuality,
    source_epsg: Option<u32>,
) -> ScoreResult {
    let mut score = 0.0;
    let mut recommendations = Vec::new();

    // Geometry completeness: 25 pts, -1 per 4% null rate.
    let null_rate_pct = geometry.null_rate() * 100.0;
    score += (25.0 - (null_rate_pct / 4.0)).max(0.0);
    if null_rate_pct > 5.0 {
        recommendations.push(format!(
            "{null_rate_pct:.1}% of geometries are null."
        ));
    }

    // Validity: 25 pts, linear with validity rate.
    let validity_pct = geometry.validity_rate() * 100.0;
    score += validity_pct / 4.0;
    if validity_pct < 95.0 {
        recommendations.push(format!(
            "Geometry validity is {validity_pct:.1}%; inspect the source data."
        ));
    }

    // Attribute completeness: 20 pts, linear.
    let completeness_pct = attributes.completeness_rate() * 100.0;
    score += completeness_pct / 5.0;
    if completeness_pct < 80.0 {
        recommendations.push(format!(
            "Attribute completeness is low: {completeness_pct:.1}%."
        ));
    }

    // CRS known: 15 pts full, else 5.
    if source_epsg.is_some() {
        score += 15.0;
    } else {
        score += 5.0;
        recommendations.push("Projection not detected; specify the source EPSG manually.".into());
    }

    // Type quality: 15 pts, -2 per text column with > 50 distinct values.
    let over_threshold = attributes.text_columns_over_threshold(TEXT_DISTINCT_THRESHOLD);
    let type_score = (15.0 - 2.0 * over_threshold as f64).max(0.0);
    score += type_score;

    let score = score.clamp(0.0, 100.0);
    let grade = Grade::from_score(score);

    ScoreResult {
        score,
        grade,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perfect_geometry() -> GeometryQuality {
        GeometryQuality {
            input_count: 10,
            null_geometry_count: 0,
            invalid_before_repair: 0,
            unfixable_count: 0,
            duplicates_removed: 0,
            output_count: 10,
        }
    }

    fn perfect_attributes() -> AttributeQuality {
        AttributeQuality {
            columns: vec![],
            total_cells: 0,
            null_cells: 0,
        }
    }

    #[test]
    fn perfect_dataset_scores_full_marks() {
        let result = compute_score(&perfect_geometry(), &perfect_attributes(), Some(4326));
        assert_eq!(result.score, 100.0);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn unknown_crs_caps_projection_points_and_recommends() {
        let result = compute_score(&perfect_geometry(), &perfect_attributes(), None);
        assert_eq!(result.score, 90.0);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn score_never_leaves_valid_range() {
        let geometry = GeometryQuality {
            input_count: 10,
            null_geometry_count: 10,
            invalid_before_repair: 10,
            unfixable_count: 10,
            duplicates_removed: 0,
            output_count: 0,
        };
        let result = compute_score(&geometry, &perfect_attributes(), None);
        assert!((0.0..=100.0).contains(&result.score));
    }

    proptest::proptest! {
        #[test]
        fn score_stays_in_range_for_any_plausible_stats(
            input_count in 1u64..1000,
            null_fraction in 0.0f64..1.0,
            invalid_fraction in 0.0f64..1.0,
            total_cells in 0u64..1000,
            null_fraction_cells in 0.0f64..1.0,
            source_epsg in proptest::option::of(1u32..32767),
        ) {
            let geometry = GeometryQuality {
                input_count,
                null_geometry_count: (input_count as f64 * null_fraction) as u64,
                invalid_before_repair: (input_count as f64 * invalid_fraction) as u64,
                unfixable_count: 0,
                duplicates_removed: 0,
                output_count: input_count,
            };
            let attributes = AttributeQuality {
                columns: vec![],
                total_cells,
                null_cells: (total_cells as f64 * null_fraction_cells) as u64,
            };

            let result = compute_score(&geometry, &attributes, source_epsg);
            prop_assert!((0.0..=100.0).contains(&result.score));
        }
    }
}
