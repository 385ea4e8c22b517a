// [libs/domain/models/src/job.rs]
//! The central job record (§3) and its state machine (§4.8).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::{Encoding, GeometryKind, OutputFormat};
use crate::quality::QualityReport;

/// Job lifecycle status. Transitions are restricted to the edges drawn in
/// spec.md §4.8; `can_transition_to` is the single source of truth other
/// crates consult before writing a new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Success,
    Failed,
    Expired,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Success => "success",
            JobStatus::Failed => "failed",
            JobStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "processing" => Some(JobStatus::Processing),
            "success" => Some(JobStatus::Success),
            "failed" => Some(JobStatus::Failed),
            "expired" => Some(JobStatus::Expired),
            _ => None,
        }
    }

    /// Whether `self -> next` is one of the edges in §4.8's diagram.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Success)
                | (JobStatus::Processing, JobStatus::Failed)
                | (JobStatus::Success, JobStatus::Expired)
        )
    }
}

/// Format-specific write options bag (§3), opaque to the job manager.
pub type OptionsBag = serde_json::Map<String, serde_json::Value>;

/// Parameters requested at submission time (§3 "Parameters").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionParams {
    pub output_format: OutputFormat,
    pub target_epsg: Option<u32>,
    pub fix_geometries: bool,
    pub normalize_attributes: bool,
    pub encoding: Encoding,
    pub options: OptionsBag,
}

/// The outcome half of a job record (§3 "Outcome").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobOutcome {
    pub output_storage_path: Option<String>,
    pub output_size_bytes: Option<u64>,
    pub output_feature_count: Option<u64>,
    pub processing_time_seconds: Option<f64>,
    pub quality_report: Option<QualityReport>,
    pub download_expires_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub error_trace: Option<String>,
}

/// The central persisted record (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    // Identification
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub dispatch_task_id: Option<String>,

    // Input descriptor
    pub original_filename: String,
    pub input_storage_path: String,
    pub input_size_bytes: u64,
    pub detected_source_format: Option<String>,
    pub detected_source_epsg: Option<u32>,
    pub detected_geometry_kind: Option<GeometryKind>,
    pub input_feature_count: Option<u64>,

    // Parameters
    pub params: ConversionParams,

    // Outcome
    pub status: JobStatus,
    pub outcome: JobOutcome,

    // Timestamps
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ConversionJob {
    pub fn new(
        user_id: Uuid,
        original_filename: String,
        input_storage_path: String,
        input_size_bytes: u64,
        params: ConversionParams,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            user_id,
            dispatch_task_id: None,
            original_filename,
            input_storage_path,
            input_size_bytes,
            detected_source_format: None,
            detected_source_epsg: None,
            detected_geometry_kind: None,
            input_feature_count: None,
            params,
            status: JobStatus::Pending,
            outcome: JobOutcome::default(),
            created_at: now,
            started_at: None,
            completed_at: None,
        }
    }

    /// Validates job invariants (b)-(e) from spec.md §3. Used by tests and
    /// by repository implementations before they commit a row.
    pub fn check_invariants(&self) -> Result<(), String> {
        if (self.started_at.is_none()) != (self.status == JobStatus::Pending) {
            return Err("started_at must be null iff status == pending".into());
        }
        let completed = matches!(
            self.status,
            JobStatus::Success | JobStatus::Failed | JobStatus::Expired
        );
        if self.completed_at.is_some() != completed {
            return Err("completed_at must be set iff status is terminal".into());
        }
        if let Some(expires) = self.outcome.download_expires_at {
            let completed_at = self
                .completed_at
                .ok_or("download_expires_at set without completed_at")?;
            if expires <= completed_at {
                return Err("download_expires_at must be strictly after completed_at".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [JobStatus; 5] = [
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Success,
        JobStatus::Failed,
        JobStatus::Expired,
    ];

    #[test]
    fn transition_graph_matches_the_lifecycle_exactly() {
        let allowed: &[(JobStatus, JobStatus)] = &[
            (JobStatus::Pending, JobStatus::Processing),
            (JobStatus::Processing, JobStatus::Success),
            (JobStatus::Processing, JobStatus::Failed),
            (JobStatus::Success, JobStatus::Expired),
        ];

        for &from in &ALL_STATUSES {
            for &to in &ALL_STATUSES {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "transition {from:?} -> {to:?} should be {expected}"
                );
            }
        }
    }

    #[test]
    fn failed_and_expired_are_terminal() {
        for &to in &ALL_STATUSES {
            assert!(!JobStatus::Failed.can_transition_to(to));
            assert!(!JobStatus::Expired.can_transition_to(to));
        }
    }

    #[test]
    fn no_status_transitions_to_itself() {
        for &status in &ALL_STATUSES {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn as_str_and_parse_round_trip() {
        for &status in &ALL_STATUSES {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("bogus"), None);
    }
}
