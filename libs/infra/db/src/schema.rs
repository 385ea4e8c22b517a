// [libs/infra/db/src/schema.rs]
//! Idempotent DDL for the conversion ledger, applied on every connect.
//! Mirrors the teacher's table-array-plus-context pattern.

use anyhow::{Context, Result};
use libsql::Connection;
use tracing::{debug, info};

const BASE_TABLES: &[(&str, &str)] = &[
    ("TABLE_USERS", r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
    "#),
    ("TABLE_SUBSCRIPTIONS", r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            user_id TEXT PRIMARY KEY REFERENCES users(user_id),
            plan TEXT NOT NULL DEFAULT 'free',
            conversions_used_this_month INTEGER NOT NULL DEFAULT 0,
            current_period_start TEXT NOT NULL,
            current_period_end TEXT NOT NULL
        );
    "#),
    ("TABLE_JOBS", r#"
        CREATE TABLE IF NOT EXISTS jobs (
            job_id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(user_id),
            dispatch_task_id TEXT,
            original_filename TEXT NOT NULL,
            input_storage_path TEXT NOT NULL,
            input_size_bytes INTEGER NOT NULL,
            detected_source_format TEXT,
            detected_source_epsg INTEGER,
            detected_geometry_kind TEXT,
            input_feature_count INTEGER,
            output_format TEXT NOT NULL,
            target_epsg INTEGER,
            fix_geometries INTEGER NOT NULL,
            normalize_attributes INTEGER NOT NULL,
            encoding TEXT NOT NULL,
            options_json TEXT NOT NULL DEFAULT '{}',
            status TEXT NOT NULL DEFAULT 'pending',
            output_storage_path TEXT,
            output_size_bytes INTEGER,
            output_feature_count INTEGER,
            processing_time_seconds REAL,
            quality_report_json TEXT,
            download_expires_at TEXT,
            error_message TEXT,
            error_trace TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            started_at TEXT,
            completed_at TEXT
        );
    "#),
];

const ACCELERATION_INDEXES: &[(&str, &str)] = &[
    ("IDX_JOBS_USER", "CREATE INDEX IF NOT EXISTS idx_jobs_user ON jobs(user_id);"),
    ("IDX_JOBS_STATUS", "CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);"),
    (
        "IDX_JOBS_EXPIRY",
        "CREATE INDEX IF NOT EXISTS idx_jobs_expiry ON jobs(status, download_expires_at);",
    ),
];

/// Applies the full schema. Safe to call on every connect: every statement
/// is an `IF NOT EXISTS` / idempotent DDL operation.
pub async fn apply_schema(connection: &Connection) -> Result<()> {
    info!("applying conversion ledger schema");

    for (identifier, sql) in BASE_TABLES {
        debug!(table = identifier, "creating table");
        connection
            .execute(sql, ())
            .await
            .with_context(|| format!("failed to create {identifier}"))?;
    }

    for (identifier, sql) in ACCELERATION_INDEXES {
        debug!(index = identifier, "creating index");
        connection
            .execute(sql, ())
            .await
            .with_context(|| format!("failed to create {identifier}"))?;
    }

    info!("conversion ledger schema level");
    Ok(())
}
