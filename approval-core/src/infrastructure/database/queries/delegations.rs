/// One row per delegator; re-setting replaces it.
pub const DELEGATION_UPSERT: &str = r#"
    INSERT INTO delegations (delegator_user_id, delegate_user_id, active, created_at, revoked_at)
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT(delegator_user_id) DO UPDATE SET
      delegate_user_id = excluded.delegate_user_id,
      active = excluded.active,
      revoked_at = excluded.revoked_at
"#;

pub const DELEGATION_FIND: &str = r#"
    SELECT delegator_user_id, delegate_user_id, active, created_at, revoked_at
    FROM delegations
    WHERE delegator_user_id = ?
"#;

pub const DELEGATION_ACTIVE_EXISTS: &str = r#"
    SELECT 1
    FROM delegations
    WHERE delegator_user_id = ? AND delegate_user_id = ? AND active = 1
    LIMIT 1
"#;
