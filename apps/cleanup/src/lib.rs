// [apps/cleanup/src/lib.rs]
//! Cleanup task library surface: configuration and the sweep itself,
//! exercised directly by `main.rs`.

pub mod config;
pub mod sweep;

pub use config::{CleanupDirectives, StorageBackendTag};
pub use sweep::{run_once, SweepReport};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use geoconvert_domain_models::format::{Encoding, OutputFormat};
    use geoconvert_domain_models::job::{ConversionJob, ConversionParams};
    use geoconvert_domain_models::plan::{PlanType, Subscription};
    use geoconvert_domain_models::quality::{
        AttributeQuality, DetectionConfidence, Grade, GeometryQuality, ProjectionInfo, QualityReport,
    };
    use geoconvert_domain_models::user::User;
    use geoconvert_infra_db::repositories::{JobRepository, SubscriptionRepository, UserRepository};
    use geoconvert_infra_db::DbClient;
    use geoconvert_infra_storage::{LocalStorage, StorageBackend};
    use uuid::Uuid;

    use super::*;

    fn sample_params() -> ConversionParams {
        ConversionParams {
            output_format: OutputFormat::GeoJson,
            target_epsg: None,
            fix_geometries: true,
            normalize_attributes: true,
            encoding: Encoding::Utf8,
            options: serde_json::Map::new(),
        }
    }

    fn dummy_report() -> QualityReport {
        QualityReport {
            score: 95.0,
            grade: Grade::A,
            projection: ProjectionInfo {
                detected_epsg: Some(4326),
                confidence: DetectionConfidence::High,
                method: Some("ogr_metadata".into()),
            },
            geometry: GeometryQuality {
                input_count: 3,
                null_geometry_count: 0,
                invalid_before_repair: 0,
                unfixable_count: 0,
                duplicates_removed: 0,
                output_count: 3,
            },
            attributes: AttributeQuality {
                columns: Vec::new(),
                total_cells: 0,
                null_cells: 0,
            },
            recommendations: Vec::new(),
            extra: std::collections::HashMap::new(),
        }
    }

    #[tokio::test]
    async fn sweep_deletes_artifact_and_expires_job_past_ttl() {
        let client = DbClient::connect(":memory:", None).await.unwrap();

        let user = User {
            user_id: Uuid::new_v4(),
            email: "c@example.com".into(),
            is_active: true,
            created_at: Utc::now(),
        };
        UserRepository::new(client.connection().unwrap())
            .create(&user)
            .await
            .unwrap();

        let subscription = Subscription {
            user_id: user.user_id,
            plan: PlanType::Enterprise,
            conversions_used_this_month: 0,
            current_period_start: Utc::now() - Duration::days(1),
            current_period_end: Utc::now() + Duration::days(29),
        };
        SubscriptionRepository::new(client.connection().unwrap())
            .create(&subscription)
            .await
            .unwrap();

        let jobs = JobRepository::new(client.connection().unwrap());
        let job = ConversionJob::new(
            user.user_id,
            "parcels.zip".into(),
            "file://inputs/parcels.zip".into(),
            1024,
            sample_params(),
            Utc::now() - Duration::hours(26),
        );
        jobs.insert_with_quota_increment(&job, None).await.unwrap();
        jobs.mark_processing(job.job_id, Utc::now() - Duration::hours(26))
            .await
            .unwrap();

        let storage_dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
            storage_dir.path(),
            "https://api.example.test/v1/artifacts",
        ));
        let output_path = storage
            .save(b"converted output", "parcels.geojson", "outputs/job")
            .await
            .unwrap();

        jobs.mark_success(
            job.job_id,
            Utc::now() - Duration::hours(25),
            &output_path,
            17,
            3,
            0.2,
            &dummy_report(),
            Utc::now() - Duration::hours(1),
        )
        .await
        .unwrap();

        let report = run_once(&jobs, &storage, Utc::now()).await.unwrap();
        assert_eq!(report.expired, 1);
        assert_eq!(report.failed, 0);

        let reloaded = jobs.find(job.job_id).await.unwrap();
        assert_eq!(reloaded.status, geoconvert_domain_models::job::JobStatus::Expired);
        assert!(reloaded.outcome.output_storage_path.is_none());
        assert!(storage.read(&output_path).await.is_err());
    }

    #[tokio::test]
    async fn sweep_is_a_no_op_when_nothing_has_expired() {
        let client = DbClient::connect(":memory:", None).await.unwrap();
        let jobs = JobRepository::new(client.connection().unwrap());
        let storage_dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
            storage_dir.path(),
            "https://api.example.test/v1/artifacts",
        ));

        let report = run_once(&jobs, &storage, Utc::now()).await.unwrap();
        assert_eq!(report.expired, 0);
        assert_eq!(report.failed, 0);
    }
}
