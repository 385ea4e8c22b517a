// [libs/infra/db/src/repositories/subscriptions.rs]
//! Subscription repository: quota state read by the submission path
//! (§4.8 step 1) ahead of `JobRepository::insert_with_quota_increment`'s
//! transactional re-check.

use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};
use uuid::Uuid;

use geoconvert_domain_models::plan::{PlanType, Subscription};

use crate::errors::DbError;

fn map_row_to_subscription(row: &Row) -> Result<Subscription, DbError> {
    let user_id: String = row.get(0)?;
    let plan: String = row.get(1)?;
    let conversions_used_this_month: i64 = row.get(2)?;
    let current_period_start: String = row.get(3)?;
    let current_period_end: String = row.get(4)?;

    let parse_ts = |s: &str| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DbError::MappingError(e.to_string()))
    };

    Ok(Subscription {
        user_id: Uuid::parse_str(&user_id).map_err(|e| DbError::MappingError(e.to_string()))?,
        plan: PlanType::parse(&plan)
            .ok_or_else(|| DbError::MappingError(format!("unknown plan {plan}")))?,
        conversions_used_this_month: conversions_used_this_month as u32,
        current_period_start: parse_ts(&current_period_start)?,
        current_period_end: parse_ts(&current_period_end)?,
    })
}

pub struct SubscriptionRepository {
    connection: Connection,
}

impl SubscriptionRepository {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub async fn create(&self, subscription: &Subscription) -> Result<(), DbError> {
        self.connection
            .execute(
                "INSERT INTO subscriptions (
                    user_id, plan, conversions_used_this_month,
                    current_period_start, current_period_end
                ) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    subscription.user_id.to_string(),
                    subscription.plan.as_str(),
                    subscription.conversions_used_this_month as i64,
                    subscription.current_period_start.to_rfc3339(),
                    subscription.current_period_end.to_rfc3339(),
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn find_for_user(&self, user_id: Uuid) -> Result<Subscription, DbError> {
        let mut rows = self
            .connection
            .query(
                "SELECT user_id, plan, conversions_used_this_month,
                        current_period_start, current_period_end
                 FROM subscriptions WHERE user_id = ?1",
                params![user_id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => map_row_to_subscription(&row),
            None => Err(DbError::SubscriptionNotFound),
        }
    }

    /// Persists a period rollover performed in-memory by
    /// `Subscription::roll_period_if_expired`.
    pub async fn roll_period(&self, subscription: &Subscription) -> Result<(), DbError> {
        self.connection
            .execute(
                "UPDATE subscriptions SET
                    conversions_used_this_month = ?2,
                    current_period_start = ?3,
                    current_period_end = ?4
                 WHERE user_id = ?1",
                params![
                    subscription.user_id.to_string(),
                    subscription.conversions_used_this_month as i64,
                    subscription.current_period_start.to_rfc3339(),
                    subscription.current_period_end.to_rfc3339(),
                ],
            )
            .await?;
        Ok(())
    }
}
