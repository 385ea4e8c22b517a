// [libs/infra/db/src/repositories/job/queries.rs]
//! SQL text for the job repository, kept out of the control-flow code.

pub const INSERT_JOB: &str = "
    INSERT INTO jobs (
        job_id, user_id, dispatch_task_id,
        original_filename, input_storage_path, input_size_bytes,
        output_format, target_epsg, fix_geometries, normalize_attributes,
        encoding, options_json, status, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
";

pub const INCREMENT_SUBSCRIPTION_COUNTER: &str = "
    UPDATE subscriptions
    SET conversions_used_this_month = conversions_used_this_month + 1
    WHERE user_id = ?1
";

pub const FIND_BY_ID: &str = "SELECT * FROM jobs WHERE job_id = ?1";

pub const SET_DISPATCH_TASK_ID: &str = "
    UPDATE jobs SET dispatch_task_id = ?2 WHERE job_id = ?1
";

pub const MARK_PROCESSING: &str = "
    UPDATE jobs SET status = 'processing', started_at = ?2
    WHERE job_id = ?1 AND status = 'pending'
";

pub const UPDATE_DETECTION: &str = "
    UPDATE jobs SET
        detected_source_format = ?2,
        detected_source_epsg = ?3,
        detected_geometry_kind = ?4,
        input_feature_count = ?5
    WHERE job_id = ?1
";

pub const MARK_SUCCESS: &str = "
    UPDATE jobs SET
        status = 'success',
        completed_at = ?2,
        output_storage_path = ?3,
        output_size_bytes = ?4,
        output_feature_count = ?5,
        processing_time_seconds = ?6,
        quality_report_json = ?7,
        download_expires_at = ?8
    WHERE job_id = ?1 AND status = 'processing'
";

pub const MARK_FAILED: &str = "
    UPDATE jobs SET
        status = 'failed',
        completed_at = ?2,
        error_message = ?3,
        error_trace = ?4
    WHERE job_id = ?1 AND status = 'processing'
";

pub const MARK_EXPIRED: &str = "
    UPDATE jobs SET status = 'expired', output_storage_path = NULL
    WHERE job_id = ?1 AND status = 'success'
";

pub const FIND_EXPIRED_SUCCESSFUL: &str = "
    SELECT job_id, output_storage_path FROM jobs
    WHERE status = 'success'
      AND output_storage_path IS NOT NULL
      AND download_expires_at < ?1
";

pub const LIST_FOR_USER: &str = "
    SELECT * FROM jobs WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2
";

pub const COUNT_ACTIVE: &str = "
    SELECT COUNT(*) FROM jobs WHERE status IN ('pending', 'processing')
";
