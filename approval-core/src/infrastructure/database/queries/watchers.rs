/// Duplicate registrations are silently ignored.
pub const WATCHER_INSERT: &str = r#"
    INSERT OR IGNORE INTO request_watchers (request_id, user_id, kind, created_at)
    VALUES (?, ?, ?, ?)
"#;

pub const WATCHERS_FOR_REQUEST: &str = r#"
    SELECT request_id, user_id, kind, created_at
    FROM request_watchers
    WHERE request_id = ?
    ORDER BY created_at ASC
"#;

pub const WATCHER_USER_IDS_FOR_REQUEST: &str = r#"
    SELECT user_id FROM request_watchers WHERE request_id = ?
"#;
