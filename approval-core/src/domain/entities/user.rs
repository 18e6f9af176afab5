use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directory entry for a user. `role` is a free-form tag (`admin`, `user`,
/// ...); `dept` is the free-form department label conditions match against.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub dept: Option<String>,
    pub manager_id: Option<i64>,
    pub dept_id: Option<i64>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
}
