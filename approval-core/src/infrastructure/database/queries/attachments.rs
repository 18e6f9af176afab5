pub const ATTACHMENT_INSERT: &str = r#"
    INSERT INTO attachments (request_id, uploader_user_id, filename, content_type, size, storage_path, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub const ATTACHMENT_FIND_BY_ID: &str = r#"
    SELECT id, request_id, uploader_user_id, filename, content_type, size, storage_path, created_at
    FROM attachments
    WHERE id = ?
"#;

pub const ATTACHMENTS_FOR_REQUEST: &str = r#"
    SELECT id, request_id, uploader_user_id, filename, content_type, size, storage_path, created_at
    FROM attachments
    WHERE request_id = ?
    ORDER BY id ASC
"#;
