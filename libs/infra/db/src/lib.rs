// [libs/infra/db/src/lib.rs]
//! Tactical persistence adapter (C8) for the conversion ledger: users,
//! subscriptions and jobs, backed by libSQL.

pub mod client;
pub mod errors;
pub mod repositories;
pub mod schema;

pub use client::DbClient;
pub use errors::DbError;
pub use repositories::{JobRepository, SubscriptionRepository, UserRepository};

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use geoconvert_domain_models::format::{Encoding, OutputFormat};
    use geoconvert_domain_models::job::{ConversionJob, ConversionParams};
    use geoconvert_domain_models::plan::{PlanType, Subscription};
    use geoconvert_domain_models::user::User;
    use uuid::Uuid;

    use super::*;

    async fn memory_client() -> DbClient {
        DbClient::connect(":memory:", None)
            .await
            .expect("in-memory connect")
    }

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

    #[tokio::test]
    async fn insert_with_quota_increment_blocks_once_limit_reached() {
        let client = memory_client().await;

        let user = User {
            user_id: Uuid::new_v4(),
            email: "a@example.com".into(),
            is_active: true,
            created_at: Utc::now(),
        };
        UserRepository::new(client.connection().unwrap())
            .create(&user)
            .await
            .unwrap();

        let subscription = Subscription {
            user_id: user.user_id,
            plan: PlanType::Free,
            conversions_used_this_month: 4,
            current_period_start: Utc::now() - Duration::days(1),
            current_period_end: Utc::now() + Duration::days(29),
        };
        SubscriptionRepository::new(client.connection().unwrap())
            .create(&subscription)
            .await
            .unwrap();

        let jobs = JobRepository::new(client.connection().unwrap());
        let limit = PlanType::Free.monthly_conversion_limit();

        let first_job = ConversionJob::new(
            user.user_id,
            "parcels.zip".into(),
            "/tmp/in.zip".into(),
            1024,
            sample_params(),
            Utc::now(),
        );
        jobs.insert_with_quota_increment(&first_job, limit).await.unwrap();

        let second_job = ConversionJob::new(
            user.user_id,
            "parcels2.zip".into(),
            "/tmp/in2.zip".into(),
            1024,
            sample_params(),
            Utc::now(),
        );
        let result = jobs.insert_with_quota_increment(&second_job, limit).await;
        assert!(matches!(result, Err(DbError::QuotaExhausted)));
    }

    #[tokio::test]
    async fn quota_never_exceeded_under_concurrent_submissions() {
        let client = memory_client().await;

        let user = User {
            user_id: Uuid::new_v4(),
            email: "d@example.com".into(),
            is_active: true,
            created_at: Utc::now(),
        };
        UserRepository::new(client.connection().unwrap())
            .create(&user)
            .await
            .unwrap();

        let limit = PlanType::Starter.monthly_conversion_limit().unwrap();
        let subscription = Subscription {
            user_id: user.user_id,
            plan: PlanType::Starter,
            conversions_used_this_month: limit - 3,
            current_period_start: Utc::now() - Duration::days(1),
            current_period_end: Utc::now() + Duration::days(29),
        };
        SubscriptionRepository::new(client.connection().unwrap())
            .create(&subscription)
            .await
            .unwrap();

        // Ten concurrent submissions race for the three remaining slots.
        // `libsql`'s single-writer-connection semantics serialize the
        // transactions, so the in-transaction re-check (not the pre-check)
        // is what keeps the sum from drifting past `limit`.
        let attempts = futures::future::join_all((0..10).map(|i| {
            let client = client.clone();
            let user_id = user.user_id;
            async move {
                let jobs = JobRepository::new(client.connection().unwrap());
                let job = ConversionJob::new(
                    user_id,
                    format!("parcels_{i}.zip"),
                    format!("/tmp/in_{i}.zip"),
                    1024,
                    sample_params(),
                    Utc::now(),
                );
                jobs.insert_with_quota_increment(&job, Some(limit)).await
            }
        }))
        .await;

        let accepted = attempts.iter().filter(|r| r.is_ok()).count();
        assert_eq!(accepted, 3);

        let subscriptions = SubscriptionRepository::new(client.connection().unwrap());
        let reloaded = subscriptions.find_for_user(user.user_id).await.unwrap();
        assert_eq!(reloaded.conversions_used_this_month, limit);
        assert!(reloaded.conversions_used_this_month <= limit);
    }

    #[tokio::test]
    async fn job_state_machine_rejects_out_of_order_transitions() {
        let client = memory_client().await;

        let user = User {
            user_id: Uuid::new_v4(),
            email: "b@example.com".into(),
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
            "/tmp/in.zip".into(),
            1024,
            sample_params(),
            Utc::now(),
        );
        jobs.insert_with_quota_increment(&job, None).await.unwrap();

        // success before processing must be rejected (status constraint in
        // the WHERE clause, not an affected-rows accident).
        let bad = jobs
            .mark_success(
                job.job_id,
                Utc::now(),
                "/artifacts/out.geojson",
                10,
                5,
                0.4,
                &dummy_report(),
                Utc::now() + Duration::hours(24),
            )
            .await;
        assert!(matches!(bad, Err(DbError::InvalidTransition)));

        jobs.mark_processing(job.job_id, Utc::now()).await.unwrap();
        jobs.mark_success(
            job.job_id,
            Utc::now(),
            "/artifacts/out.geojson",
            10,
            5,
            0.4,
            &dummy_report(),
            Utc::now() + Duration::hours(24),
        )
        .await
        .unwrap();

        let reloaded = jobs.find(job.job_id).await.unwrap();
        assert_eq!(reloaded.status, geoconvert_domain_models::job::JobStatus::Success);
        assert_eq!(
            reloaded.outcome.output_storage_path.as_deref(),
            Some("/artifacts/out.geojson")
        );
    }

    fn dummy_report() -> geoconvert_domain_models::quality::QualityReport {
        use geoconvert_domain_models::quality::{
            AttributeQuality, DetectionConfidence, Grade, GeometryQuality, ProjectionInfo, QualityReport,
        };
        QualityReport {
            score: 100.0,
            grade: Grade::A,
            projection: ProjectionInfo {
                detected_epsg: Some(4326),
                confidence: DetectionConfidence::High,
                method: Some("ogr_metadata".into()),
            },
            geometry: GeometryQuality {
                input_count: 5,
                null_geometry_count: 0,
                invalid_before_repair: 0,
                unfixable_count: 0,
                duplicates_removed: 0,
                output_count: 5,
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
}
