use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata row for an uploaded file. The blob itself lives outside the
/// database under the opaque `storage_path`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attachment {
    pub id: i64,
    pub request_id: i64,
    pub uploader_user_id: i64,
    pub filename: String,
    pub content_type: Option<String>,
    pub size: i64,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
}
