use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user read-model row derived from qualifying request events.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub request_id: i64,
    pub event_type: String,
    pub actor_user_id: Option<i64>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}
