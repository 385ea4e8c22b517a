// [libs/domain/models/src/lib.rs]
//! Shared DTOs and domain entities for the GeoConvert workspace.
//!
//! This crate has no I/O and no business logic of its own: it is the
//! single source of truth for the shapes every other crate passes around.

pub mod dataset;
pub mod error;
pub mod format;
pub mod job;
pub mod magic;
pub mod plan;
pub mod quality;
pub mod user;

pub mod prelude {
    pub use crate::dataset::{AttributeMap, RawDataset, RawFeature};
    pub use crate::error::CoreError;
    pub use crate::format::{Encoding, GeometryKind, OutputFormat};
    pub use crate::job::{ConversionJob, ConversionParams, JobOutcome, JobStatus, OptionsBag};
    pub use crate::magic::{expected_magic, validate_file_magic};
    pub use crate::plan::{PlanType, Subscription};
    pub use crate::quality::{
        AttributeQuality, ColumnStat, DetectionConfidence, GeometryQuality, Grade, ProjectionInfo,
        QualityReport,
    };
    pub use crate::user::User;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_params() -> ConversionParams {
        ConversionParams {
            output_format: OutputFormat::GeoJson,
            target_epsg: None,
            fix_geometries: true,
            normalize_attributes: true,
            encoding: Encoding::Utf8,
            options: Default::default(),
        }
    }

    #[test]
    fn new_job_starts_pending_with_no_timestamps() {
        let job = ConversionJob::new(
            Uuid::new_v4(),
            "parcels.zip".into(),
            "uploads/parcels.zip".into(),
            1024,
            sample_params(),
            Utc::now(),
        );
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.started_at.is_none());
        assert!(job.completed_at.is_none());
        assert!(job.check_invariants().is_ok());
    }

    #[test]
    fn status_transition_graph_matches_state_machine() {
        use JobStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Success));
        assert!(Processing.can_transition_to(Failed));
        assert!(Success.can_transition_to(Expired));

        assert!(!Pending.can_transition_to(Success));
        assert!(!Pending.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Expired));
        assert!(!Success.can_transition_to(Processing));
        assert!(!Expired.can_transition_to(Pending));
    }

    #[test]
    fn quota_remaining_respects_plan_limit() {
        let mut sub = Subscription {
            user_id: Uuid::new_v4(),
            plan: PlanType::Free,
            conversions_used_this_month: 4,
            current_period_start: Utc::now(),
            current_period_end: Utc::now() + chrono::Duration::days(30),
        };
        assert!(sub.has_quota_remaining());
        sub.conversions_used_this_month = 5;
        assert!(!sub.has_quota_remaining());

        sub.plan = PlanType::Enterprise;
        assert!(sub.has_quota_remaining());
    }
}
