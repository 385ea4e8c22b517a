// [libs/domain/jobs/src/validation.rs]
//! Submission-time validation (§4.8 step 2), run before anything touches
//! the database or the dispatch queue.

use std::path::Path;

use geoconvert_domain_models::job::ConversionParams;
use geoconvert_domain_models::plan::PlanType;

use crate::error::JobServiceError;

/// EPSG codes are a 16-bit authority range; values outside it can never be
/// a real CRS and are rejected up front.
const MIN_VALID_EPSG: u32 = 1024;
const MAX_VALID_EPSG: u32 = 32767;

pub fn validate_params(params: &ConversionParams) -> Result<(), JobServiceError> {
    if let Some(epsg) = params.target_epsg {
        if !(MIN_VALID_EPSG..=MAX_VALID_EPSG).contains(&epsg) {
            return Err(JobServiceError::InvalidInput(format!(
                "target_epsg {epsg} is outside the valid range {MIN_VALID_EPSG}-{MAX_VALID_EPSG}"
            )));
        }
    }
    Ok(())
}

pub fn validate_input_exists(input_storage_path: &str) -> Result<(), JobServiceError> {
    if input_storage_path.starts_with("s3://") {
        // Object-store existence is checked by the worker at read time; the
        // submission path only rejects locally-resolvable paths that are
        // already known to be absent.
        return Ok(());
    }
    let relative = input_storage_path.trim_start_matches("file://");
    if !Path::new(relative).exists() {
        return Err(JobServiceError::InvalidInput(format!(
            "input_storage_path {input_storage_path} does not exist"
        )));
    }
    Ok(())
}

pub fn validate_size_limit(plan: PlanType, input_size_bytes: u64) -> Result<(), JobServiceError> {
    if input_size_bytes > plan.max_upload_bytes() {
        return Err(JobServiceError::SizeLimit);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoconvert_domain_models::format::{Encoding, OutputFormat};

    fn params_with_epsg(target_epsg: Option<u32>) -> ConversionParams {
        ConversionParams {
            output_format: OutputFormat::GeoJson,
            target_epsg,
            fix_geometries: true,
            normalize_attributes: true,
            encoding: Encoding::Utf8,
            options: serde_json::Map::new(),
        }
    }

    #[test]
    fn epsg_within_authority_range_is_accepted() {
        assert!(validate_params(&params_with_epsg(Some(4326))).is_ok());
        assert!(validate_params(&params_with_epsg(None)).is_ok());
    }

    #[test]
    fn epsg_outside_authority_range_is_rejected() {
        assert!(matches!(
            validate_params(&params_with_epsg(Some(999))),
            Err(JobServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_params(&params_with_epsg(Some(40000))),
            Err(JobServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn size_limit_rejects_oversized_free_plan_upload() {
        let result = validate_size_limit(PlanType::Free, 200 * 1024 * 1024);
        assert!(matches!(result, Err(JobServiceError::SizeLimit)));
    }

    #[test]
    fn size_limit_accepts_upload_within_plan_budget() {
        assert!(validate_size_limit(PlanType::Pro, 500 * 1024 * 1024).is_ok());
    }

    #[test]
    fn missing_local_input_is_rejected() {
        let result = validate_input_exists("file://definitely/not/a/real/path.zip");
        assert!(matches!(result, Err(JobServiceError::InvalidInput(_))));
    }

    #[test]
    fn remote_backend_paths_pass_through() {
        assert!(validate_input_exists("s3://bucket/key").is_ok());
    }
}
