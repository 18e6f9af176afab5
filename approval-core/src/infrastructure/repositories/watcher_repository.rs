use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::domain::entities::{RequestWatcher, WatcherKind};
use crate::infrastructure::database::queries::watchers::*;
use crate::shared::{AppError, AppResult};

#[derive(sqlx::FromRow)]
struct WatcherRow {
    request_id: i64,
    user_id: i64,
    kind: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<WatcherRow> for RequestWatcher {
    type Error = AppError;

    fn try_from(row: WatcherRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse::<WatcherKind>().map_err(AppError::Internal)?;
        Ok(RequestWatcher {
            request_id: row.request_id,
            user_id: row.user_id,
            kind,
            created_at: row.created_at,
        })
    }
}

/// Register a watcher; re-registering the same (user, kind) is a no-op.
pub async fn add_watcher(
    conn: &mut SqliteConnection,
    request_id: i64,
    user_id: i64,
    kind: WatcherKind,
) -> AppResult<()> {
    sqlx::query(WATCHER_INSERT)
        .bind(request_id)
        .bind(user_id)
        .bind(kind.to_string())
        .bind(Utc::now())
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn list_watchers(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> AppResult<Vec<RequestWatcher>> {
    let rows = sqlx::query_as::<_, WatcherRow>(WATCHERS_FOR_REQUEST)
        .bind(request_id)
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(RequestWatcher::try_from).collect()
}

pub async fn watcher_user_ids(conn: &mut SqliteConnection, request_id: i64) -> AppResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(WATCHER_USER_IDS_FOR_REQUEST)
        .bind(request_id)
        .fetch_all(conn)
        .await?;
    Ok(ids)
}
