use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::domain::entities::Notification;
use crate::infrastructure::database::queries::notifications::*;
use crate::shared::AppResult;

pub async fn insert_notification(
    conn: &mut SqliteConnection,
    user_id: i64,
    request_id: i64,
    event_type: &str,
    actor_user_id: Option<i64>,
    message: Option<&str>,
    created_at: DateTime<Utc>,
) -> AppResult<i64> {
    let result = sqlx::query(NOTIFICATION_INSERT)
        .bind(user_id)
        .bind(request_id)
        .bind(event_type)
        .bind(actor_user_id)
        .bind(message)
        .bind(created_at)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn list_notifications(
    conn: &mut SqliteConnection,
    user_id: i64,
    limit: i64,
) -> AppResult<Vec<Notification>> {
    let rows = sqlx::query_as::<_, Notification>(NOTIFICATIONS_FOR_USER)
        .bind(user_id)
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// Mark one of the user's notifications read. Returns whether the row
/// exists for that user at all; marking an already-read row is a no-op
/// that still reports `true`.
pub async fn mark_notification_read(
    conn: &mut SqliteConnection,
    notification_id: i64,
    user_id: i64,
) -> AppResult<bool> {
    let result = sqlx::query(NOTIFICATION_MARK_READ)
        .bind(Utc::now())
        .bind(notification_id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() > 0 {
        return Ok(true);
    }
    let exists = sqlx::query_scalar::<_, i64>(NOTIFICATION_EXISTS)
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(exists.is_some())
}
