use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::domain::entities::{Task, TaskStatus};
use crate::infrastructure::database::queries::tasks::*;
use crate::shared::{AppError, AppResult};

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    request_id: i64,
    step_order: Option<i64>,
    step_key: String,
    assignee_user_id: Option<i64>,
    assignee_role: Option<String>,
    status: String,
    decided_by: Option<i64>,
    decided_at: Option<DateTime<Utc>>,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<TaskStatus>().map_err(AppError::Internal)?;
        Ok(Task {
            id: row.id,
            request_id: row.request_id,
            step_order: row.step_order,
            step_key: row.step_key,
            assignee_user_id: row.assignee_user_id,
            assignee_role: row.assignee_role,
            status,
            decided_by: row.decided_by,
            decided_at: row.decided_at,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

pub async fn create_task(
    conn: &mut SqliteConnection,
    request_id: i64,
    step_order: Option<i64>,
    step_key: &str,
    assignee_user_id: Option<i64>,
    assignee_role: Option<&str>,
) -> AppResult<i64> {
    let result = sqlx::query(TASK_INSERT)
        .bind(request_id)
        .bind(step_order)
        .bind(step_key)
        .bind(assignee_user_id)
        .bind(assignee_role)
        .bind(Utc::now())
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

/// The synthetic task a returned request hands back to its owner.
/// Step order 0 sorts it ahead of every real workflow step.
pub async fn create_resubmit_task(
    conn: &mut SqliteConnection,
    request_id: i64,
    owner_user_id: i64,
) -> AppResult<i64> {
    create_task(conn, request_id, Some(0), "resubmit", Some(owner_user_id), None).await
}

pub async fn get_task(conn: &mut SqliteConnection, task_id: i64) -> AppResult<Option<Task>> {
    let row = sqlx::query_as::<_, TaskRow>(TASK_FIND_BY_ID)
        .bind(task_id)
        .fetch_optional(conn)
        .await?;
    row.map(Task::try_from).transpose()
}

/// Write a terminal status. Returns `false` when the task was no longer
/// pending; callers report that as `task_already_decided`. This guard is
/// what serializes two concurrent decisions on the same task.
pub async fn decide_task(
    conn: &mut SqliteConnection,
    task_id: i64,
    status: TaskStatus,
    decided_by: i64,
    comment: Option<&str>,
) -> AppResult<bool> {
    let result = sqlx::query(TASK_DECIDE)
        .bind(status.to_string())
        .bind(decided_by)
        .bind(Utc::now())
        .bind(comment)
        .bind(task_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Reassign a pending task to a user, clearing any role target.
pub async fn transfer_task(
    conn: &mut SqliteConnection,
    task_id: i64,
    assignee_user_id: i64,
) -> AppResult<bool> {
    let result = sqlx::query(TASK_TRANSFER)
        .bind(assignee_user_id)
        .bind(task_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_request_tasks(conn: &mut SqliteConnection, request_id: i64) -> AppResult<Vec<Task>> {
    let rows = sqlx::query_as::<_, TaskRow>(TASKS_FOR_REQUEST)
        .bind(request_id)
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(Task::try_from).collect()
}

/// The parallel group for one step. Always re-read inside the operation's
/// transaction; group state must never be cached across operations.
pub async fn list_tasks_for_step(
    conn: &mut SqliteConnection,
    request_id: i64,
    step_order: i64,
) -> AppResult<Vec<Task>> {
    let rows = sqlx::query_as::<_, TaskRow>(TASKS_FOR_STEP)
        .bind(request_id)
        .bind(step_order)
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(Task::try_from).collect()
}

pub async fn list_inbox_tasks(
    conn: &mut SqliteConnection,
    user_id: i64,
    role: &str,
) -> AppResult<Vec<Task>> {
    let rows = sqlx::query_as::<_, TaskRow>(TASKS_INBOX)
        .bind(user_id)
        .bind(role)
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(Task::try_from).collect()
}

pub async fn cancel_pending_tasks_for_step(
    conn: &mut SqliteConnection,
    request_id: i64,
    step_order: i64,
    except_task_id: i64,
    decided_by: i64,
) -> AppResult<()> {
    sqlx::query(TASKS_CANCEL_PENDING_FOR_STEP)
        .bind(decided_by)
        .bind(Utc::now())
        .bind(request_id)
        .bind(step_order)
        .bind(except_task_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// `decided_by` here marks who caused the cancellation (e.g. the owner on
/// resubmit or withdraw), not who decided the underlying approval.
pub async fn cancel_all_pending_tasks(
    conn: &mut SqliteConnection,
    request_id: i64,
    decided_by: i64,
) -> AppResult<()> {
    sqlx::query(TASKS_CANCEL_ALL_PENDING)
        .bind(decided_by)
        .bind(Utc::now())
        .bind(request_id)
        .execute(conn)
        .await?;
    Ok(())
}
