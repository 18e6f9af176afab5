//! Owner-level request operations: create, resubmit, withdraw, void, and
//! watcher registration.

use serde_json::Value;
use sqlx::SqliteConnection;
use tracing::{info, instrument};

use crate::application::services::{events, workflow_engine};
use crate::domain::entities::{EventType, Request, RequestStatus, WatcherKind};
use crate::infrastructure::database::DatabaseService;
use crate::infrastructure::repositories::{
    request_repository, task_repository, user_repository, watcher_repository, workflow_repository,
};
use crate::shared::{Actor, AppError, AppResult};

/// Canonical content triple for create/resubmit. The payload arrives
/// pre-validated by the boundary's payload layer; the engine only insists
/// it is a JSON object.
pub struct RequestContent<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub payload: Option<&'a Value>,
}

fn validate_content(content: &RequestContent<'_>) -> AppResult<(String, String, Option<String>)> {
    if let Some(payload) = content.payload {
        if !payload.is_object() {
            return Err(AppError::validation("invalid_payload"));
        }
    }
    let title = content.title.trim();
    let body = content.body.trim();
    if title.is_empty() || body.is_empty() {
        return Err(AppError::validation("missing_fields"));
    }
    let payload_json = content
        .payload
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok((title.to_string(), body.to_string(), payload_json))
}

/// Create a request and materialize its first approval step.
///
/// Variant resolution: an explicitly named workflow must exist and be
/// enabled (its request type then overrides the caller's); otherwise the
/// default for `(request_type, creator dept)`; otherwise the request type
/// doubles as the workflow key.
#[instrument(skip(db, actor, content), fields(actor_id = actor.id))]
pub async fn create_request(
    db: &DatabaseService,
    actor: &Actor,
    request_type: &str,
    workflow: Option<&str>,
    content: RequestContent<'_>,
) -> AppResult<Request> {
    let mut tx = db.pool().begin().await?;

    let mut request_type = {
        let trimmed = request_type.trim();
        if trimmed.is_empty() { "generic" } else { trimmed }.to_string()
    };

    let workflow_key = match workflow.map(str::trim).filter(|w| !w.is_empty()) {
        Some(requested) => {
            let variant = workflow_repository::get_variant(&mut tx, requested)
                .await?
                .filter(|v| v.enabled)
                .ok_or_else(|| AppError::validation("invalid_workflow"))?;
            request_type = variant.request_type;
            variant.workflow_key
        }
        None => {
            workflow_repository::resolve_default_workflow_key(&mut tx, &request_type, actor.dept.as_deref())
                .await?
                .unwrap_or_else(|| request_type.clone())
        }
    };

    let (title, body, payload_json) = validate_content(&content)?;

    let request_id = request_repository::create_request(
        &mut tx,
        actor.id,
        &request_type,
        Some(&workflow_key),
        &title,
        &body,
        payload_json.as_deref(),
    )
    .await?;
    events::record_request_event(
        &mut tx,
        request_id,
        EventType::Created,
        Some(actor.id),
        Some(&format!("type={} workflow={}", request_type, workflow_key)),
    )
    .await?;
    workflow_engine::start_workflow(&mut tx, request_id, actor, &request_type, &workflow_key).await?;
    info!(request_id, %request_type, %workflow_key, "request created");

    let request = reload(&mut tx, request_id).await?;
    tx.commit().await?;
    Ok(request)
}

/// Owner resubmits a returned request with corrected content. Restarts
/// the workflow from its first step, using the stored variant when it is
/// still set.
#[instrument(skip(db, actor, content), fields(actor_id = actor.id))]
pub async fn resubmit_request(
    db: &DatabaseService,
    actor: &Actor,
    request_id: i64,
    content: RequestContent<'_>,
) -> AppResult<Request> {
    let mut tx = db.pool().begin().await?;

    let request = request_repository::get_request(&mut tx, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("not_found"))?;
    if request.user_id != actor.id {
        return Err(AppError::not_authorized());
    }
    if request.status != RequestStatus::ChangesRequested {
        return Err(AppError::conflict("not_editable"));
    }

    let (title, body, payload_json) = validate_content(&content)?;

    // The cancellation of the resubmit task is owned by the owner; this is
    // not an approver decision.
    task_repository::cancel_all_pending_tasks(&mut tx, request_id, actor.id).await?;
    request_repository::reset_request_for_resubmit(&mut tx, request_id, &title, &body, payload_json.as_deref())
        .await?;
    events::record_request_event(&mut tx, request_id, EventType::Resubmitted, Some(actor.id), None).await?;

    let workflow_key = match request.workflow_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => key.to_string(),
        None => workflow_repository::resolve_default_workflow_key(
            &mut tx,
            &request.request_type,
            actor.dept.as_deref(),
        )
        .await?
        .unwrap_or_else(|| request.request_type.clone()),
    };
    workflow_engine::start_workflow(&mut tx, request_id, actor, &request.request_type, &workflow_key).await?;
    info!(request_id, "request resubmitted");

    let request = reload(&mut tx, request_id).await?;
    tx.commit().await?;
    Ok(request)
}

/// Owner withdraws a request that has not been decided yet.
#[instrument(skip(db, actor), fields(actor_id = actor.id))]
pub async fn withdraw_request(db: &DatabaseService, actor: &Actor, request_id: i64) -> AppResult<Request> {
    let mut tx = db.pool().begin().await?;

    let request = request_repository::get_request(&mut tx, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("not_found"))?;
    if request.user_id != actor.id {
        return Err(AppError::not_authorized());
    }
    if !request.status.is_editable() {
        return Err(AppError::conflict("not_editable"));
    }

    task_repository::cancel_all_pending_tasks(&mut tx, request_id, actor.id).await?;
    request_repository::update_request_status(&mut tx, request_id, RequestStatus::Withdrawn, None).await?;
    events::record_request_event(&mut tx, request_id, EventType::Withdrawn, Some(actor.id), None).await?;
    info!(request_id, "request withdrawn");

    let request = reload(&mut tx, request_id).await?;
    tx.commit().await?;
    Ok(request)
}

/// Admin voids a request, same preconditions as withdraw.
#[instrument(skip(db, actor), fields(actor_id = actor.id))]
pub async fn void_request(db: &DatabaseService, actor: &Actor, request_id: i64) -> AppResult<Request> {
    if !actor.is_admin() {
        return Err(AppError::not_authorized());
    }
    let mut tx = db.pool().begin().await?;

    let request = request_repository::get_request(&mut tx, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("not_found"))?;
    if !request.status.is_editable() {
        return Err(AppError::conflict("not_editable"));
    }

    task_repository::cancel_all_pending_tasks(&mut tx, request_id, actor.id).await?;
    request_repository::update_request_status(&mut tx, request_id, RequestStatus::Voided, None).await?;
    events::record_request_event(&mut tx, request_id, EventType::Voided, Some(actor.id), None).await?;
    info!(request_id, "request voided");

    let request = reload(&mut tx, request_id).await?;
    tx.commit().await?;
    Ok(request)
}

/// Register watchers on a request. Owner or admin only; every listed user
/// must exist. Duplicate registrations are ignored.
#[instrument(skip(db, actor, user_ids), fields(actor_id = actor.id))]
pub async fn add_watchers(
    db: &DatabaseService,
    actor: &Actor,
    request_id: i64,
    kind: &str,
    user_ids: &[i64],
) -> AppResult<()> {
    let kind = kind
        .parse::<WatcherKind>()
        .map_err(|_| AppError::validation("invalid_kind"))?;
    if user_ids.is_empty() {
        return Err(AppError::validation("missing_fields"));
    }

    let mut tx = db.pool().begin().await?;
    let request = request_repository::get_request(&mut tx, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("not_found"))?;
    if !actor.is_admin() && request.user_id != actor.id {
        return Err(AppError::not_authorized());
    }
    for user_id in user_ids {
        if user_repository::get_user_by_id(&mut tx, *user_id).await?.is_none() {
            return Err(AppError::validation("invalid_user_id"));
        }
        watcher_repository::add_watcher(&mut tx, request_id, *user_id, kind).await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn reload(conn: &mut SqliteConnection, request_id: i64) -> AppResult<Request> {
    request_repository::get_request(conn, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("request_not_found"))
}
