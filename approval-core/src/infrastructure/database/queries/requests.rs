pub const REQUEST_SELECT_FIELDS: &str = r#"
    id, user_id, request_type, workflow_key, title, body, payload_json,
    status, decided_by, decided_at, created_at, updated_at
"#;

pub const REQUEST_INSERT: &str = r#"
    INSERT INTO requests (user_id, request_type, workflow_key, title, body, payload_json, status, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const REQUEST_FIND_BY_ID: &str = r#"
    SELECT id, user_id, request_type, workflow_key, title, body, payload_json,
           status, decided_by, decided_at, created_at, updated_at
    FROM requests
    WHERE id = ?
"#;

pub const REQUESTS_LIST_ALL: &str = r#"
    SELECT id, user_id, request_type, workflow_key, title, body, payload_json,
           status, decided_by, decided_at, created_at, updated_at
    FROM requests
    ORDER BY id DESC
"#;

pub const REQUESTS_LIST_FOR_USER: &str = r#"
    SELECT id, user_id, request_type, workflow_key, title, body, payload_json,
           status, decided_by, decided_at, created_at, updated_at
    FROM requests
    WHERE user_id = ?
    ORDER BY id DESC
"#;

pub const REQUEST_OWNER: &str = "SELECT user_id FROM requests WHERE id = ?";

/// Non-deciding status change (pending, changes_requested, withdrawn, voided).
pub const REQUEST_SET_STATUS: &str = r#"
    UPDATE requests SET status = ?, updated_at = ? WHERE id = ?
"#;

/// Terminal decision: status + decider written together.
pub const REQUEST_SET_DECIDED: &str = r#"
    UPDATE requests SET status = ?, decided_by = ?, decided_at = ?, updated_at = ? WHERE id = ?
"#;

/// Resubmit: overwrite content, back to pending, clear any stale decision.
pub const REQUEST_RESET_FOR_RESUBMIT: &str = r#"
    UPDATE requests
    SET title = ?, body = ?, payload_json = ?, status = 'pending',
        decided_by = NULL, decided_at = NULL, updated_at = ?
    WHERE id = ?
"#;
