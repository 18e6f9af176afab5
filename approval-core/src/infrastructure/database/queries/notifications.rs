pub const NOTIFICATION_INSERT: &str = r#"
    INSERT INTO notifications (user_id, request_id, event_type, actor_user_id, message, created_at, read_at)
    VALUES (?, ?, ?, ?, ?, ?, NULL)
"#;

pub const NOTIFICATIONS_FOR_USER: &str = r#"
    SELECT id, user_id, request_id, event_type, actor_user_id, message, created_at, read_at
    FROM notifications
    WHERE user_id = ?
    ORDER BY id DESC
    LIMIT ?
"#;

/// Only the owner may mark a row, and only once.
pub const NOTIFICATION_MARK_READ: &str = r#"
    UPDATE notifications SET read_at = ? WHERE id = ? AND user_id = ? AND read_at IS NULL
"#;

pub const NOTIFICATION_EXISTS: &str = r#"
    SELECT 1 FROM notifications WHERE id = ? AND user_id = ?
"#;
