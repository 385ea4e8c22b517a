// [libs/infra/db/src/repositories/users.rs]
//! User repository: the identity side of ownership checks (§3, §4.9).

use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};
use uuid::Uuid;

use geoconvert_domain_models::user::User;

use crate::errors::DbError;

fn map_row_to_user(row: &Row) -> Result<User, DbError> {
    let user_id: String = row.get(0)?;
    let email: String = row.get(1)?;
    let is_active: i64 = row.get(2)?;
    let created_at: String = row.get(3)?;

    Ok(User {
        user_id: Uuid::parse_str(&user_id).map_err(|e| DbError::MappingError(e.to_string()))?,
        email,
        is_active: is_active != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DbError::MappingError(e.to_string()))?,
    })
}

pub struct UserRepository {
    connection: Connection,
}

impl UserRepository {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub async fn create(&self, user: &User) -> Result<(), DbError> {
        self.connection
            .execute(
                "INSERT INTO users (user_id, email, is_active, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    user.user_id.to_string(),
                    user.email.clone(),
                    user.is_active as i64,
                    user.created_at.to_rfc3339(),
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn find(&self, user_id: Uuid) -> Result<User, DbError> {
        let mut rows = self
            .connection
            .query(
                "SELECT user_id, email, is_active, created_at FROM users WHERE user_id = ?1",
                params![user_id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => map_row_to_user(&row),
            None => Err(DbError::UserNotFound),
        }
    }
}
