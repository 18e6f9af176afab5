//! The request state machine: starting a workflow and advancing it after
//! each task decision. All reads and writes happen in the caller's
//! transaction.

use sqlx::SqliteConnection;
use tracing::info;

use crate::application::services::{assignees, conditions, events};
use crate::domain::entities::{
    AssigneeKind, EventType, Request, RequestStatus, Task, TaskDecision, TaskStatus,
    WorkflowVariantStep,
};
use crate::infrastructure::repositories::{
    request_repository, task_repository, user_repository, workflow_repository,
};
use crate::shared::{Actor, AppError, AppResult};

/// Step list for a request, via the authoritative fallback chain:
/// workflow_key -> request_type -> `generic`. Variants may be deleted out
/// from under live requests; the chain keeps them moving.
async fn load_steps_with_fallback(
    conn: &mut SqliteConnection,
    workflow_key: &str,
    request_type: &str,
) -> AppResult<Vec<WorkflowVariantStep>> {
    let mut steps = workflow_repository::list_steps(&mut *conn, workflow_key).await?;
    if steps.is_empty() && workflow_key != request_type {
        steps = workflow_repository::list_steps(&mut *conn, request_type).await?;
    }
    if steps.is_empty() {
        steps = workflow_repository::list_steps(conn, "generic").await?;
    }
    Ok(steps)
}

/// Entry point for request creation: resolve the variant key if the caller
/// did not pin one, then start the workflow.
pub async fn create_initial_task(
    conn: &mut SqliteConnection,
    request_id: i64,
    creator: &Actor,
    request_type: &str,
    workflow_key: Option<&str>,
) -> AppResult<()> {
    let key = match workflow_key.filter(|k| !k.is_empty()) {
        Some(key) => key.to_string(),
        None => {
            workflow_repository::resolve_default_workflow_key(&mut *conn, request_type, creator.dept.as_deref())
                .await?
                .unwrap_or_else(|| request_type.to_string())
        }
    };
    start_workflow(conn, request_id, creator, request_type, &key).await
}

/// Materialize the first step of the workflow.
///
/// With no steps anywhere in the fallback chain, a synthetic single-admin
/// task keeps the request actionable. When every step's guard fails, the
/// textually first step is used anyway: a fully gated workflow must still
/// produce an approver rather than silently auto-approve.
pub async fn start_workflow(
    conn: &mut SqliteConnection,
    request_id: i64,
    creator: &Actor,
    request_type: &str,
    workflow_key: &str,
) -> AppResult<()> {
    let steps = load_steps_with_fallback(&mut *conn, workflow_key, request_type).await?;

    if steps.is_empty() {
        info!(request_id, workflow_key, "no steps configured, creating synthetic admin task");
        task_repository::create_task(&mut *conn, request_id, Some(1), "admin", None, Some("admin")).await?;
        events::record_request_event(conn, request_id, EventType::TaskCreated, None, Some("step=admin")).await?;
        return Ok(());
    }

    let request = request_repository::get_request(&mut *conn, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("request_not_found"))?;
    let payload = request.payload_object();

    let first = conditions::find_next_step(&steps, None, payload, creator.dept.as_deref())
        .unwrap_or(&steps[0]);
    let step_key = assignees::create_tasks_for_step(&mut *conn, request_id, creator, first).await?;
    events::record_request_event(
        conn,
        request_id,
        EventType::TaskCreated,
        None,
        Some(&format!("step={}", step_key)),
    )
    .await?;
    Ok(())
}

/// Advance the request after `task` was decided.
///
/// Parallel-group semantics hinge on re-reading every task sharing
/// `(request_id, step_order)` inside this same transaction; a single task
/// row never carries enough information to decide.
pub async fn advance_after_decision(
    conn: &mut SqliteConnection,
    actor: &Actor,
    task: &Task,
    request: &Request,
    decision: TaskDecision,
    comment: Option<&str>,
) -> AppResult<Request> {
    let request_id = request.id;
    let request_type = request.request_type.as_str();

    let workflow_key = match request.workflow_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => key.to_string(),
        None => {
            workflow_repository::resolve_default_workflow_key(&mut *conn, request_type, actor.dept.as_deref())
                .await?
                .unwrap_or_else(|| request_type.to_string())
        }
    };
    let steps = load_steps_with_fallback(&mut *conn, &workflow_key, request_type).await?;

    // Legacy tasks carry no step_order; recover it from the step key.
    let current_order = match task.step_order {
        Some(order) => Some(order),
        None => steps
            .iter()
            .find(|s| s.step_key == task.step_key)
            .map(|s| s.step_order),
    };

    let payload = request.payload_object();
    let creator_row = user_repository::get_user_by_id(&mut *conn, request.user_id)
        .await?
        .ok_or_else(|| AppError::Internal("request owner missing".to_string()))?;
    let creator_dept = creator_row.dept.as_deref();

    let current_step = current_order.and_then(|order| steps.iter().find(|s| s.step_order == order));
    let current_kind = current_step.map(|s| s.assignee_kind);
    let is_users_any = current_kind == Some(AssigneeKind::UsersAny);
    let is_users_all = current_kind == Some(AssigneeKind::UsersAll);

    if decision == TaskDecision::Rejected {
        if is_users_any {
            if let Some(order) = current_order {
                // One "no" among many does not kill an any-of step while a
                // sibling is still pending or has already approved.
                let group = task_repository::list_tasks_for_step(&mut *conn, request_id, order).await?;
                let pending_left = group.iter().any(Task::is_pending);
                let approved_any = group.iter().any(|t| t.status == TaskStatus::Approved);
                if pending_left || approved_any {
                    return reload_request(conn, request_id).await;
                }
            }
        }

        // A terminal request must leave no pending tasks behind; a reject
        // that kills a users_all group also closes the other members.
        task_repository::cancel_all_pending_tasks(&mut *conn, request_id, actor.id).await?;
        request_repository::update_request_status(&mut *conn, request_id, RequestStatus::Rejected, Some(actor.id))
            .await?;
        events::record_request_event(
            &mut *conn,
            request_id,
            EventType::RequestRejected,
            Some(actor.id),
            comment,
        )
        .await?;
        info!(request_id, actor = actor.id, "request rejected");
        return reload_request(conn, request_id).await;
    }

    if is_users_all {
        if let Some(order) = current_order {
            let group = task_repository::list_tasks_for_step(&mut *conn, request_id, order).await?;
            if !group.is_empty() && !group.iter().all(|t| t.status == TaskStatus::Approved) {
                return reload_request(conn, request_id).await;
            }
        }
    }

    if is_users_any {
        if let Some(order) = current_order {
            // First approval wins; the losing siblings are canceled.
            task_repository::cancel_pending_tasks_for_step(&mut *conn, request_id, order, task.id, actor.id)
                .await?;
        }
    }

    if let Some(order) = current_order {
        // Add-signed singletons behave like users_all: wait out the group.
        let group = task_repository::list_tasks_for_step(&mut *conn, request_id, order).await?;
        if group.iter().any(Task::is_pending) {
            return reload_request(conn, request_id).await;
        }
    }

    let next = conditions::find_next_step(&steps, current_order, payload, creator_dept);
    if let Some(next_step) = next {
        let creator = Actor::from(&creator_row);
        let step_key = assignees::create_tasks_for_step(&mut *conn, request_id, &creator, next_step).await?;
        events::record_request_event(
            &mut *conn,
            request_id,
            EventType::TaskCreated,
            None,
            Some(&format!("step={}", step_key)),
        )
        .await?;
        request_repository::update_request_status(&mut *conn, request_id, RequestStatus::Pending, None).await?;
        return reload_request(conn, request_id).await;
    }

    request_repository::update_request_status(&mut *conn, request_id, RequestStatus::Approved, Some(actor.id))
        .await?;
    events::record_request_event(
        &mut *conn,
        request_id,
        EventType::RequestApproved,
        Some(actor.id),
        comment,
    )
    .await?;
    info!(request_id, actor = actor.id, "request approved");
    reload_request(conn, request_id).await
}

async fn reload_request(conn: &mut SqliteConnection, request_id: i64) -> AppResult<Request> {
    request_repository::get_request(conn, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("request_not_found"))
}
