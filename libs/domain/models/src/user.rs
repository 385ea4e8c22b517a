// [libs/domain/models/src/user.rs]
//! Minimal user identity. Authentication and account management are
//! explicitly out of scope (§2 Non-goals); this crate only needs enough of
//! a `User` to own a `Subscription` and a list of `ConversionJob`s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
