use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// At most one row per delegator. While `active`, the delegate may act on
/// any task whose user assignee is the delegator.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Delegation {
    pub delegator_user_id: i64,
    pub delegate_user_id: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}
