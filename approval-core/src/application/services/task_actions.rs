//! User-facing operations on a pending task. Every verb runs in a single
//! transaction: load, authorize, mutate, audit, advance.

use sqlx::SqliteConnection;
use tracing::{info, instrument};

use crate::application::services::{events, workflow_engine};
use crate::domain::entities::{EventType, Request, RequestStatus, Task, TaskDecision, TaskStatus};
use crate::infrastructure::database::DatabaseService;
use crate::infrastructure::repositories::{
    delegation_repository, request_repository, task_repository, user_repository,
};
use crate::shared::{Actor, AppError, AppResult};

/// Direct authorization: assignee or role-holder.
pub fn can_act_on_task(actor: &Actor, task: &Task) -> bool {
    if task.assignee_user_id == Some(actor.id) {
        return true;
    }
    matches!(&task.assignee_role, Some(role) if *role == actor.role)
}

/// Authorization including an active delegation from the task's user
/// assignee to the actor.
pub async fn can_act_on_task_with_delegation(
    conn: &mut SqliteConnection,
    actor: &Actor,
    task: &Task,
) -> AppResult<bool> {
    if can_act_on_task(actor, task) {
        return Ok(true);
    }
    let Some(assignee_user_id) = task.assignee_user_id else {
        return Ok(false);
    };
    delegation_repository::is_active_delegate(conn, assignee_user_id, actor.id).await
}

/// Common preamble: the task must exist and be pending, the parent request
/// must exist and be pending. Returns both.
async fn load_pending_task_and_request(
    conn: &mut SqliteConnection,
    task_id: i64,
) -> AppResult<(Task, Request)> {
    let task = task_repository::get_task(&mut *conn, task_id)
        .await?
        .ok_or_else(|| AppError::not_found("task_not_found"))?;
    if !task.is_pending() {
        return Err(AppError::conflict("task_already_decided"));
    }
    let request = request_repository::get_request(&mut *conn, task.request_id)
        .await?
        .ok_or_else(|| AppError::not_found("request_not_found"))?;
    if request.status != RequestStatus::Pending {
        return Err(AppError::conflict("request_already_decided"));
    }
    Ok((task, request))
}

/// Approve or reject a pending task, then let the engine advance the
/// request.
#[instrument(skip(db, actor, comment), fields(actor_id = actor.id))]
pub async fn decide_task(
    db: &DatabaseService,
    actor: &Actor,
    task_id: i64,
    decision: TaskDecision,
    comment: Option<&str>,
) -> AppResult<Request> {
    let mut tx = db.pool().begin().await?;
    let request = decide_task_in_tx(&mut tx, actor, task_id, decision, comment).await?;
    tx.commit().await?;
    Ok(request)
}

pub(crate) async fn decide_task_in_tx(
    conn: &mut SqliteConnection,
    actor: &Actor,
    task_id: i64,
    decision: TaskDecision,
    comment: Option<&str>,
) -> AppResult<Request> {
    let (task, request) = load_pending_task_and_request(&mut *conn, task_id).await?;
    if !can_act_on_task_with_delegation(&mut *conn, actor, &task).await? {
        return Err(AppError::not_authorized());
    }

    // Conditional on status = pending; losing a concurrent race surfaces
    // as the same conflict a late caller would have seen.
    let decided =
        task_repository::decide_task(&mut *conn, task_id, decision.as_status(), actor.id, comment).await?;
    if !decided {
        return Err(AppError::conflict("task_already_decided"));
    }
    events::record_request_event(
        &mut *conn,
        request.id,
        EventType::TaskDecided,
        Some(actor.id),
        Some(&format!(
            "task={} step={} decision={}",
            task_id, task.step_key, decision
        )),
    )
    .await?;
    info!(task_id, decision = %decision, "task decided");

    workflow_engine::advance_after_decision(conn, actor, &task, &request, decision, comment).await
}

/// Return the request to its owner for changes. Cancels everything still
/// pending and hands the owner a synthetic resubmit task at step order 0.
#[instrument(skip(db, actor, comment), fields(actor_id = actor.id))]
pub async fn return_for_changes(
    db: &DatabaseService,
    actor: &Actor,
    task_id: i64,
    comment: Option<&str>,
) -> AppResult<Request> {
    let mut tx = db.pool().begin().await?;

    let (task, request) = load_pending_task_and_request(&mut tx, task_id).await?;
    if !can_act_on_task_with_delegation(&mut tx, actor, &task).await? {
        return Err(AppError::not_authorized());
    }

    let returned =
        task_repository::decide_task(&mut tx, task_id, TaskStatus::Returned, actor.id, comment).await?;
    if !returned {
        return Err(AppError::conflict("task_already_decided"));
    }
    events::record_request_event(
        &mut tx,
        request.id,
        EventType::TaskReturned,
        Some(actor.id),
        Some(&format!("task={} step={}", task_id, task.step_key)),
    )
    .await?;

    task_repository::cancel_all_pending_tasks(&mut tx, request.id, actor.id).await?;
    request_repository::update_request_status(&mut tx, request.id, RequestStatus::ChangesRequested, None)
        .await?;
    events::record_request_event(
        &mut tx,
        request.id,
        EventType::ChangesRequested,
        Some(actor.id),
        comment,
    )
    .await?;
    task_repository::create_resubmit_task(&mut tx, request.id, request.user_id).await?;
    events::record_request_event(&mut tx, request.id, EventType::TaskCreated, None, Some("step=resubmit"))
        .await?;
    info!(task_id, request_id = request.id, "request returned for changes");

    let request = request_repository::get_request(&mut tx, request.id)
        .await?
        .ok_or_else(|| AppError::not_found("request_not_found"))?;
    tx.commit().await?;
    Ok(request)
}

/// Reassign a pending task to another user. Does not decide the task.
/// Admins may transfer any task; everyone else needs `can_act`.
#[instrument(skip(db, actor), fields(actor_id = actor.id))]
pub async fn transfer_task(
    db: &DatabaseService,
    actor: &Actor,
    task_id: i64,
    assignee_user_id: i64,
) -> AppResult<Request> {
    let mut tx = db.pool().begin().await?;

    let (task, request) = load_pending_task_and_request(&mut tx, task_id).await?;
    if !actor.is_admin() && !can_act_on_task_with_delegation(&mut tx, actor, &task).await? {
        return Err(AppError::not_authorized());
    }
    if user_repository::get_user_by_id(&mut tx, assignee_user_id).await?.is_none() {
        return Err(AppError::not_found("user_not_found"));
    }

    let transferred = task_repository::transfer_task(&mut tx, task_id, assignee_user_id).await?;
    if !transferred {
        return Err(AppError::conflict("task_already_decided"));
    }
    events::record_request_event(
        &mut tx,
        request.id,
        EventType::TaskTransferred,
        Some(actor.id),
        Some(&format!("task={} to_user_id={}", task_id, assignee_user_id)),
    )
    .await?;
    info!(task_id, to_user = assignee_user_id, "task transferred");

    let request = request_repository::get_request(&mut tx, request.id)
        .await?
        .ok_or_else(|| AppError::not_found("request_not_found"))?;
    tx.commit().await?;
    Ok(request)
}

/// Add a co-signer: an additional pending task at the same step for
/// another user. The current task stays open, and the step now completes
/// like a users_all group: the engine waits for every pending sibling.
#[instrument(skip(db, actor), fields(actor_id = actor.id))]
pub async fn add_sign(
    db: &DatabaseService,
    actor: &Actor,
    task_id: i64,
    assignee_user_id: i64,
) -> AppResult<Request> {
    let mut tx = db.pool().begin().await?;

    let (task, request) = load_pending_task_and_request(&mut tx, task_id).await?;
    if !can_act_on_task_with_delegation(&mut tx, actor, &task).await? {
        return Err(AppError::not_authorized());
    }
    if user_repository::get_user_by_id(&mut tx, assignee_user_id).await?.is_none() {
        return Err(AppError::not_found("user_not_found"));
    }

    task_repository::create_task(
        &mut tx,
        request.id,
        task.step_order,
        &task.step_key,
        Some(assignee_user_id),
        None,
    )
    .await?;
    events::record_request_event(
        &mut tx,
        request.id,
        EventType::TaskAddsigned,
        Some(actor.id),
        Some(&format!("task={} to_user_id={}", task_id, assignee_user_id)),
    )
    .await?;
    info!(task_id, to_user = assignee_user_id, "task add-signed");

    let request = request_repository::get_request(&mut tx, request.id)
        .await?
        .ok_or_else(|| AppError::not_found("request_not_found"))?;
    tx.commit().await?;
    Ok(request)
}
