//! Attachment metadata plus the blob-store hand-off. The engine owns the
//! metadata row; content goes through the `AttachmentStore` seam.

use tracing::{info, instrument};

use crate::domain::entities::Attachment;
use crate::infrastructure::database::DatabaseService;
use crate::infrastructure::repositories::{attachment_repository, request_repository};
use crate::infrastructure::storage::AttachmentStore;
use crate::shared::{Actor, AppError, AppResult};

/// Upload size cap.
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Keep only the final path segment and a conservative character set.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .replace('\\', "/")
        .rsplit('/')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = safe.trim_matches(|c| c == ' ' || c == '.');
    let out = if trimmed.is_empty() { "file" } else { trimmed };
    out.chars().take(200).collect()
}

/// Store an attachment for a request. Owner or admin only.
#[instrument(skip(db, store, actor, data), fields(actor_id = actor.id, size = data.len()))]
pub async fn create_attachment(
    db: &DatabaseService,
    store: &dyn AttachmentStore,
    actor: &Actor,
    request_id: i64,
    filename: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> AppResult<Attachment> {
    if data.len() > MAX_ATTACHMENT_BYTES {
        return Err(AppError::validation("too_large"));
    }

    let mut tx = db.pool().begin().await?;
    let request = request_repository::get_request(&mut tx, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("not_found"))?;
    if !actor.is_admin() && request.user_id != actor.id {
        return Err(AppError::not_authorized());
    }

    let storage_path = store.put(request_id, data).await?;
    let safe_name = sanitize_filename(filename);
    let attachment_id = attachment_repository::create_attachment(
        &mut tx,
        request_id,
        actor.id,
        &safe_name,
        content_type,
        data.len() as i64,
        &storage_path,
    )
    .await?;
    let attachment = attachment_repository::get_attachment(&mut tx, attachment_id)
        .await?
        .ok_or_else(|| AppError::Internal("attachment insert lost".to_string()))?;
    tx.commit().await?;
    info!(attachment_id, "attachment stored");
    Ok(attachment)
}

/// Load an attachment's metadata and content.
pub async fn read_attachment(
    db: &DatabaseService,
    store: &dyn AttachmentStore,
    attachment_id: i64,
) -> AppResult<(Attachment, Vec<u8>)> {
    let mut conn = db.pool().acquire().await?;
    let attachment = attachment_repository::get_attachment(&mut conn, attachment_id)
        .await?
        .ok_or_else(|| AppError::not_found("not_found"))?;
    let data = store.read(&attachment.storage_path).await?;
    Ok((attachment, data))
}

pub async fn list_request_attachments(db: &DatabaseService, request_id: i64) -> AppResult<Vec<Attachment>> {
    let mut conn = db.pool().acquire().await?;
    attachment_repository::list_request_attachments(&mut conn, request_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_lose_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\report q3.pdf"), "report q3.pdf");
        assert_eq!(sanitize_filename("we!rd*name?.txt"), "we_rd_name_.txt");
        assert_eq!(sanitize_filename("  .. "), "file");
        assert_eq!(sanitize_filename(""), "file");
    }
}
