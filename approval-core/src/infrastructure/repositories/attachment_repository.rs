use chrono::Utc;
use sqlx::SqliteConnection;

use crate::domain::entities::Attachment;
use crate::infrastructure::database::queries::attachments::*;
use crate::shared::AppResult;

pub async fn create_attachment(
    conn: &mut SqliteConnection,
    request_id: i64,
    uploader_user_id: i64,
    filename: &str,
    content_type: Option<&str>,
    size: i64,
    storage_path: &str,
) -> AppResult<i64> {
    let result = sqlx::query(ATTACHMENT_INSERT)
        .bind(request_id)
        .bind(uploader_user_id)
        .bind(filename)
        .bind(content_type)
        .bind(size)
        .bind(storage_path)
        .bind(Utc::now())
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_attachment(
    conn: &mut SqliteConnection,
    attachment_id: i64,
) -> AppResult<Option<Attachment>> {
    let row = sqlx::query_as::<_, Attachment>(ATTACHMENT_FIND_BY_ID)
        .bind(attachment_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn list_request_attachments(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> AppResult<Vec<Attachment>> {
    let rows = sqlx::query_as::<_, Attachment>(ATTACHMENTS_FOR_REQUEST)
        .bind(request_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}
