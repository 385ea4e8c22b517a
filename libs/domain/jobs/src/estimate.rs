// [libs/domain/jobs/src/estimate.rs]
//! Submission-time estimated-wait hint (§4.8 step 5), computed from a
//! moving count of jobs ahead in `pending`/`processing` state times a
//! configured average-duration constant.

/// Rough average wall-clock time a conversion takes, in seconds. The
/// original implementation hardcodes `estimated_wait_seconds=30`; this is
/// the same order of magnitude expressed as a per-job rate instead.
pub const AVERAGE_JOB_DURATION_SECONDS: u64 = 8;

pub fn estimate_wait_seconds(jobs_ahead: u64) -> u64 {
    jobs_ahead.saturating_mul(AVERAGE_JOB_DURATION_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_has_zero_wait() {
        assert_eq!(estimate_wait_seconds(0), 0);
    }

    #[test]
    fn scales_linearly_with_jobs_ahead() {
        assert_eq!(estimate_wait_seconds(4), 32);
    }
}
