pub const TASK_INSERT: &str = r#"
    INSERT INTO tasks (request_id, step_order, step_key, assignee_user_id, assignee_role, status, created_at)
    VALUES (?, ?, ?, ?, ?, 'pending', ?)
"#;

pub const TASK_FIND_BY_ID: &str = r#"
    SELECT id, request_id, step_order, step_key, assignee_user_id, assignee_role,
           status, decided_by, decided_at, comment, created_at
    FROM tasks
    WHERE id = ?
"#;

/// Terminal write, conditional on the row still being pending. A zero row
/// count means a concurrent decision won and must surface as
/// `task_already_decided`.
pub const TASK_DECIDE: &str = r#"
    UPDATE tasks
    SET status = ?, decided_by = ?, decided_at = ?, comment = ?
    WHERE id = ? AND status = 'pending'
"#;

pub const TASK_TRANSFER: &str = r#"
    UPDATE tasks
    SET assignee_user_id = ?, assignee_role = NULL
    WHERE id = ? AND status = 'pending'
"#;

/// Tasks of a request, resubmit task (step 0) first, legacy rows by id.
pub const TASKS_FOR_REQUEST: &str = r#"
    SELECT id, request_id, step_order, step_key, assignee_user_id, assignee_role,
           status, decided_by, decided_at, comment, created_at
    FROM tasks
    WHERE request_id = ?
    ORDER BY COALESCE(step_order, id) ASC
"#;

/// The parallel group: every task sharing (request_id, step_order).
pub const TASKS_FOR_STEP: &str = r#"
    SELECT id, request_id, step_order, step_key, assignee_user_id, assignee_role,
           status, decided_by, decided_at, comment, created_at
    FROM tasks
    WHERE request_id = ? AND step_order = ?
    ORDER BY id ASC
"#;

/// First approval won a users_any group: close the losing siblings.
pub const TASKS_CANCEL_PENDING_FOR_STEP: &str = r#"
    UPDATE tasks
    SET status = 'canceled', decided_by = ?, decided_at = ?, comment = 'canceled'
    WHERE request_id = ? AND step_order = ? AND status = 'pending' AND id <> ?
"#;

pub const TASKS_CANCEL_ALL_PENDING: &str = r#"
    UPDATE tasks
    SET status = 'canceled', decided_by = ?, decided_at = ?, comment = 'canceled'
    WHERE request_id = ? AND status = 'pending'
"#;

/// Pending tasks visible to an actor: direct assignee, role match, or an
/// active delegation from the assignee. Requests in `changes_requested`
/// only surface their resubmit task.
pub const TASKS_INBOX: &str = r#"
    SELECT t.id, t.request_id, t.step_order, t.step_key, t.assignee_user_id, t.assignee_role,
           t.status, t.decided_by, t.decided_at, t.comment, t.created_at
    FROM tasks t
    JOIN requests r ON r.id = t.request_id
    WHERE t.status = 'pending'
      AND (
        r.status = 'pending'
        OR (r.status = 'changes_requested' AND t.step_key = 'resubmit')
      )
      AND (
        t.assignee_user_id = ?
        OR (t.assignee_role IS NOT NULL AND t.assignee_role = ?)
        OR (
          t.assignee_user_id IS NOT NULL
          AND t.assignee_user_id IN (
            SELECT delegator_user_id FROM delegations WHERE delegate_user_id = ? AND active = 1
          )
        )
      )
    ORDER BY t.id DESC
"#;
