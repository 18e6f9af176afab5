use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::domain::entities::RequestEvent;
use crate::infrastructure::database::queries::events::*;
use crate::shared::AppResult;

/// Append one audit line. Insertion order within a transaction encodes the
/// causal order of effects on the request.
pub async fn insert_event(
    conn: &mut SqliteConnection,
    request_id: i64,
    event_type: &str,
    actor_user_id: Option<i64>,
    message: Option<&str>,
    created_at: DateTime<Utc>,
) -> AppResult<i64> {
    let result = sqlx::query(EVENT_INSERT)
        .bind(request_id)
        .bind(event_type)
        .bind(actor_user_id)
        .bind(message)
        .bind(created_at)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn list_request_events(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> AppResult<Vec<RequestEvent>> {
    let events = sqlx::query_as::<_, RequestEvent>(EVENTS_FOR_REQUEST)
        .bind(request_id)
        .fetch_all(conn)
        .await?;
    Ok(events)
}
