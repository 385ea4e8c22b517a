// [libs/domain/models/src/plan.rs]
//! Subscription plans and the quota arithmetic that gates job submission.
//! Ported from `original_source/saas/backend/app/config.py`'s
//! `PLAN_*_CONVERSIONS_PER_MONTH` / `MAX_UPLOAD_SIZE_*_MB` constants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tagged plan variants, persisted as their string discriminant (§9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Free,
    Starter,
    Pro,
    Enterprise,
}

impl PlanType {
    /// Monthly conversion ceiling. `None` means unlimited (enterprise).
    pub fn monthly_conversion_limit(self) -> Option<u32> {
        match self {
            PlanType::Free => Some(5),
            PlanType::Starter => Some(100),
            PlanType::Pro => Some(1000),
            PlanType::Enterprise => None,
        }
    }

    /// Maximum accepted upload size in bytes (§6).
    pub fn max_upload_bytes(self) -> u64 {
        const MIB: u64 = 1024 * 1024;
        const GIB: u64 = 1024 * MIB;
        match self {
            PlanType::Free | PlanType::Starter => 100 * MIB,
            PlanType::Pro => 2 * GIB,
            PlanType::Enterprise => 20 * GIB,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlanType::Free => "free",
            PlanType::Starter => "starter",
            PlanType::Pro => "pro",
            PlanType::Enterprise => "enterprise",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "free" => Some(PlanType::Free),
            "starter" => Some(PlanType::Starter),
            "pro" => Some(PlanType::Pro),
            "enterprise" => Some(PlanType::Enterprise),
            _ => None,
        }
    }
}

/// The exactly-one relation to a user (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: uuid::Uuid,
    pub plan: PlanType,
    pub conversions_used_this_month: u32,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
}

impl Subscription {
    /// Whether one more submission would still respect the plan limit.
    ///
    /// A submit is allowed to make `used == limit`; the *next* one is
    /// refused. Matches spec.md §3's invariant exactly.
    pub fn has_quota_remaining(&self) -> bool {
        match self.plan.monthly_conversion_limit() {
            None => true,
            Some(limit) => self.conversions_used_this_month < limit,
        }
    }

    /// Resets the counter when the current period has elapsed.
    pub fn roll_period_if_expired(&mut self, now: DateTime<Utc>, new_period_end: DateTime<Utc>) {
        if now >= self.current_period_end {
            self.conversions_used_this_month = 0;
            self.current_period_start = now;
            self.current_period_end = new_period_end;
        }
    }
}
