pub const EVENT_INSERT: &str = r#"
    INSERT INTO request_events (request_id, event_type, actor_user_id, message, created_at)
    VALUES (?, ?, ?, ?, ?)
"#;

pub const EVENTS_FOR_REQUEST: &str = r#"
    SELECT id, request_id, event_type, actor_user_id, message, created_at
    FROM request_events
    WHERE request_id = ?
    ORDER BY id ASC
"#;
