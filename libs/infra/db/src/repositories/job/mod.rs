// [libs/infra/db/src/repositories/job/mod.rs]
//! Job repository (C8): insert-with-quota transaction, state transitions,
//! and the expiry scan the cleanup task drives. Ported in spirit from the
//! teacher's mission repository's lock-then-commit transaction shape.

pub mod queries;

use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use geoconvert_domain_models::format::{Encoding, GeometryKind, OutputFormat};
use geoconvert_domain_models::job::{ConversionJob, ConversionParams, JobOutcome, JobStatus};
use geoconvert_domain_models::quality::QualityReport;

use crate::errors::DbError;

fn parse_geometry_kind(s: &str) -> GeometryKind {
    match s {
        "Point" => GeometryKind::Point,
        "MultiPoint" => GeometryKind::MultiPoint,
        "LineString" => GeometryKind::LineString,
        "MultiLineString" => GeometryKind::MultiLineString,
        "Polygon" => GeometryKind::Polygon,
        "MultiPolygon" => GeometryKind::MultiPolygon,
        _ => GeometryKind::Unknown,
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::MappingError(format!("bad timestamp {s}: {e}")))
}

/// Maps a `SELECT * FROM jobs` row onto the domain record. Column order
/// must track `schema::BASE_TABLES`'s `jobs` definition.
fn map_row_to_job(row: &Row) -> Result<ConversionJob, DbError> {
    let job_id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let dispatch_task_id: Option<String> = row.get(2)?;
    let original_filename: String = row.get(3)?;
    let input_storage_path: String = row.get(4)?;
    let input_size_bytes: i64 = row.get(5)?;
    let detected_source_format: Option<String> = row.get(6)?;
    let detected_source_epsg: Option<i64> = row.get(7)?;
    let detected_geometry_kind: Option<String> = row.get(8)?;
    let input_feature_count: Option<i64> = row.get(9)?;
    let output_format: String = row.get(10)?;
    let target_epsg: Option<i64> = row.get(11)?;
    let fix_geometries: i64 = row.get(12)?;
    let normalize_attributes: i64 = row.get(13)?;
    let encoding: String = row.get(14)?;
    let options_json: String = row.get(15)?;
    let status: String = row.get(16)?;
    let output_storage_path: Option<String> = row.get(17)?;
    let output_size_bytes: Option<i64> = row.get(18)?;
    let output_feature_count: Option<i64> = row.get(19)?;
    let processing_time_seconds: Option<f64> = row.get(20)?;
    let quality_report_json: Option<String> = row.get(21)?;
    let download_expires_at: Option<String> = row.get(22)?;
    let error_message: Option<String> = row.get(23)?;
    let error_trace: Option<String> = row.get(24)?;
    let created_at: String = row.get(25)?;
    let started_at: Option<String> = row.get(26)?;
    let completed_at: Option<String> = row.get(27)?;

    let params = ConversionParams {
        output_format: OutputFormat::parse(&output_format)
            .ok_or_else(|| DbError::MappingError(format!("unknown output_format {output_format}")))?,
        target_epsg: target_epsg.map(|v| v as u32),
        fix_geometries: fix_geometries != 0,
        normalize_attributes: normalize_attributes != 0,
        encoding: Encoding::parse(&encoding)
            .ok_or_else(|| DbError::MappingError(format!("unknown encoding {encoding}")))?,
        options: match serde_json::from_str(&options_json) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        },
    };

    let outcome = JobOutcome {
        output_storage_path,
        output_size_bytes: output_size_bytes.map(|v| v as u64),
        output_feature_count: output_feature_count.map(|v| v as u64),
        processing_time_seconds,
        quality_report: quality_report_json
            .as_deref()
            .and_then(|s| serde_json::from_str::<QualityReport>(s).ok()),
        download_expires_at: download_expires_at
            .as_deref()
            .map(parse_rfc3339)
            .transpose()?,
        error_message,
        error_trace,
    };

    Ok(ConversionJob {
        job_id: Uuid::parse_str(&job_id).map_err(|e| DbError::MappingError(e.to_string()))?,
        user_id: Uuid::parse_str(&user_id).map_err(|e| DbError::MappingError(e.to_string()))?,
        dispatch_task_id,
        original_filename,
        input_storage_path,
        input_size_bytes: input_size_bytes as u64,
        detected_source_format,
        detected_source_epsg: detected_source_epsg.map(|v| v as u32),
        detected_geometry_kind: detected_geometry_kind.as_deref().map(parse_geometry_kind),
        input_feature_count: input_feature_count.map(|v| v as u64),
        params,
        status: JobStatus::parse(&status)
            .ok_or_else(|| DbError::MappingError(format!("unknown status {status}")))?,
        outcome,
        created_at: parse_rfc3339(&created_at)?,
        started_at: started_at.as_deref().map(parse_rfc3339).transpose()?,
        completed_at: completed_at.as_deref().map(parse_rfc3339).transpose()?,
    })
}

pub struct JobRepository {
    connection: Connection,
}

impl JobRepository {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Inserts the pending job and increments the owner's monthly counter
    /// in a single transaction (§4.8 step 3). `monthly_limit` is `None` for
    /// unlimited plans; the re-check happens inside the transaction so two
    /// concurrent submissions from the same user can't both slip past the
    /// limit.
    #[instrument(skip(self, job))]
    pub async fn insert_with_quota_increment(
        &self,
        job: &ConversionJob,
        monthly_limit: Option<u32>,
    ) -> Result<(), DbError> {
        let transaction = self
            .connection
            .transaction()
            .await
            .map_err(|_| DbError::TransactionError)?;

        let user_id = job.user_id.to_string();

        let mut subscription_rows = transaction
            .query(
                "SELECT conversions_used_this_month FROM subscriptions WHERE user_id = ?1",
                params![user_id.clone()],
            )
            .await?;

        let used_this_month: i64 = match subscription_rows.next().await? {
            Some(row) => row.get(0)?,
            None => return Err(DbError::SubscriptionNotFound),
        };
        drop(subscription_rows);

        if let Some(limit) = monthly_limit {
            if used_this_month as u32 >= limit {
                warn!(%user_id, "quota exhausted at insert time");
                return Err(DbError::QuotaExhausted);
            }
        }

        transaction
            .execute(
                queries::INSERT_JOB,
                params![
                    job.job_id.to_string(),
                    user_id.clone(),
                    job.dispatch_task_id.clone(),
                    job.original_filename.clone(),
                    job.input_storage_path.clone(),
                    job.input_size_bytes as i64,
                    job.params.output_format.as_str(),
                    job.params.target_epsg.map(|v| v as i64),
                    job.params.fix_geometries as i64,
                    job.params.normalize_attributes as i64,
                    job.params.encoding.as_str(),
                    serde_json::to_string(&job.params.options)
                        .map_err(|e| DbError::MappingError(e.to_string()))?,
                    job.status.as_str(),
                    job.created_at.to_rfc3339(),
                ],
            )
            .await?;

        transaction
            .execute(queries::INCREMENT_SUBSCRIPTION_COUNTER, params![user_id.clone()])
            .await?;

        transaction
            .commit()
            .await
            .map_err(|_| DbError::TransactionError)?;

        info!(job_id = %job.job_id, %user_id, "job inserted, quota incremented");
        Ok(())
    }

    pub async fn find(&self, job_id: Uuid) -> Result<ConversionJob, DbError> {
        let mut rows = self
            .connection
            .query(queries::FIND_BY_ID, params![job_id.to_string()])
            .await?;

        match rows.next().await? {
            Some(row) => map_row_to_job(&row),
            None => Err(DbError::JobNotFound),
        }
    }

    pub async fn list_for_user(&self, user_id: Uuid, limit: u32) -> Result<Vec<ConversionJob>, DbError> {
        let mut rows = self
            .connection
            .query(queries::LIST_FOR_USER, params![user_id.to_string(), limit])
            .await?;

        let mut jobs = Vec::new();
        while let Some(row) = rows.next().await? {
            jobs.push(map_row_to_job(&row)?);
        }
        Ok(jobs)
    }

    pub async fn set_dispatch_task_id(&self, job_id: Uuid, task_id: &str) -> Result<(), DbError> {
        self.connection
            .execute(
                queries::SET_DISPATCH_TASK_ID,
                params![job_id.to_string(), task_id],
            )
            .await?;
        Ok(())
    }

    /// `pending -> processing` (worker picked the job up).
    pub async fn mark_processing(&self, job_id: Uuid, started_at: DateTime<Utc>) -> Result<(), DbError> {
        let affected = self
            .connection
            .execute(
                queries::MARK_PROCESSING,
                params![job_id.to_string(), started_at.to_rfc3339()],
            )
            .await?;
        if affected == 0 {
            return Err(DbError::InvalidTransition);
        }
        Ok(())
    }

    pub async fn record_detection(
        &self,
        job_id: Uuid,
        source_format: Option<&str>,
        source_epsg: Option<u32>,
        geometry_kind: Option<GeometryKind>,
        feature_count: Option<u64>,
    ) -> Result<(), DbError> {
        self.connection
            .execute(
                queries::UPDATE_DETECTION,
                params![
                    job_id.to_string(),
                    source_format,
                    source_epsg.map(|v| v as i64),
                    geometry_kind.map(|k| k.as_str()),
                    feature_count.map(|v| v as i64),
                ],
            )
            .await?;
        Ok(())
    }

    /// `processing -> success` with the full completion payload (§4.8).
    #[allow(clippy::too_many_arguments)]
    pub async fn mark_success(
        &self,
        job_id: Uuid,
        completed_at: DateTime<Utc>,
        output_storage_path: &str,
        output_size_bytes: u64,
        output_feature_count: u64,
        processing_time_seconds: f64,
        quality_report: &QualityReport,
        download_expires_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let quality_report_json =
            serde_json::to_string(quality_report).map_err(|e| DbError::MappingError(e.to_string()))?;

        let affected = self
            .connection
            .execute(
                queries::MARK_SUCCESS,
                params![
                    job_id.to_string(),
                    completed_at.to_rfc3339(),
                    output_storage_path,
                    output_size_bytes as i64,
                    output_feature_count as i64,
                    processing_time_seconds,
                    quality_report_json,
                    download_expires_at.to_rfc3339(),
                ],
            )
            .await?;
        if affected == 0 {
            return Err(DbError::InvalidTransition);
        }
        Ok(())
    }

    /// `processing -> failed`.
    pub async fn mark_failed(
        &self,
        job_id: Uuid,
        completed_at: DateTime<Utc>,
        error_message: &str,
        error_trace: Option<&str>,
    ) -> Result<(), DbError> {
        let affected = self
            .connection
            .execute(
                queries::MARK_FAILED,
                params![
                    job_id.to_string(),
                    completed_at.to_rfc3339(),
                    error_message,
                    error_trace,
                ],
            )
            .await?;
        if affected == 0 {
            return Err(DbError::InvalidTransition);
        }
        Ok(())
    }

    /// `success -> expired`, used by the cleanup task after the artifact
    /// has already been deleted from storage.
    pub async fn mark_expired(&self, job_id: Uuid) -> Result<(), DbError> {
        let affected = self
            .connection
            .execute(queries::MARK_EXPIRED, params![job_id.to_string()])
            .await?;
        if affected == 0 {
            return Err(DbError::InvalidTransition);
        }
        Ok(())
    }

    /// Count of jobs currently queued or in flight system-wide, used to
    /// compute the submission-time estimated-wait hint.
    pub async fn count_active(&self) -> Result<u64, DbError> {
        let mut rows = self.connection.query(queries::COUNT_ACTIVE, ()).await?;
        match rows.next().await? {
            Some(row) => {
                let count: i64 = row.get(0)?;
                Ok(count as u64)
            }
            None => Ok(0),
        }
    }

    /// Jobs whose artifact has passed its download expiry and still has a
    /// storage path on record; feeds the hourly cleanup task.
    pub async fn find_expired_successful(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(Uuid, String)>, DbError> {
        let mut rows = self
            .connection
            .query(queries::FIND_EXPIRED_SUCCESSFUL, params![now.to_rfc3339()])
            .await?;

        let mut expired = Vec::new();
        while let Some(row) = rows.next().await? {
            let job_id: String = row.get(0)?;
            let path: String = row.get(1)?;
            let job_id = Uuid::parse_str(&job_id).map_err(|e| DbError::MappingError(e.to_string()))?;
            expired.push((job_id, path));
        }
        Ok(expired)
    }
}
