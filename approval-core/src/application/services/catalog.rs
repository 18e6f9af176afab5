//! Workflow catalog operations: the stored variants and their ordered
//! steps are the single source of truth for the engine's routing.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domain::entities::{
    AssigneeKind, NewWorkflowStep, ScopeKind, WorkflowVariant, WorkflowVariantStep,
};
use crate::infrastructure::database::DatabaseService;
use crate::infrastructure::repositories::workflow_repository;
use crate::shared::{AppError, AppResult};

/// Variant as submitted by the catalog admin surface; tags arrive as raw
/// strings and are validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInput {
    pub workflow_key: String,
    pub request_type: String,
    pub name: String,
    pub category: String,
    pub scope_kind: String,
    pub scope_value: Option<String>,
    pub enabled: bool,
    pub is_default: bool,
}

/// Step as submitted by the catalog admin surface.
///
/// `condition_kind` is deliberately not validated against the known set:
/// the evaluator treats unknown kinds as pass-through, and rejecting them
/// here would break catalogs authored against a newer evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInput {
    pub step_order: i64,
    pub step_key: String,
    pub assignee_kind: String,
    pub assignee_value: Option<String>,
    pub condition_kind: Option<String>,
    pub condition_value: Option<String>,
}

pub async fn get_variant(db: &DatabaseService, workflow_key: &str) -> AppResult<Option<WorkflowVariant>> {
    let mut conn = db.pool().acquire().await?;
    workflow_repository::get_variant(&mut conn, workflow_key).await
}

pub async fn list_steps(db: &DatabaseService, workflow_key: &str) -> AppResult<Vec<WorkflowVariantStep>> {
    let mut conn = db.pool().acquire().await?;
    workflow_repository::list_steps(&mut conn, workflow_key).await
}

/// Enabled variants a creator may pick from, stably ordered by
/// (category, name).
pub async fn list_available(db: &DatabaseService, dept: Option<&str>) -> AppResult<Vec<WorkflowVariant>> {
    let mut conn = db.pool().acquire().await?;
    workflow_repository::list_available_variants(&mut conn, dept).await
}

pub async fn list_all(db: &DatabaseService) -> AppResult<Vec<WorkflowVariant>> {
    let mut conn = db.pool().acquire().await?;
    workflow_repository::list_all_variants(&mut conn).await
}

/// The default workflow key for `(request_type, dept)`, dept scope first.
pub async fn resolve_default(
    db: &DatabaseService,
    request_type: &str,
    dept: Option<&str>,
) -> AppResult<Option<String>> {
    let mut conn = db.pool().acquire().await?;
    workflow_repository::resolve_default_workflow_key(&mut conn, request_type, dept).await
}

/// Create or update a variant. Setting `is_default` atomically clears any
/// competing default in the same (request_type, scope).
#[instrument(skip(db, input), fields(workflow_key = %input.workflow_key))]
pub async fn upsert_variant(db: &DatabaseService, input: VariantInput) -> AppResult<WorkflowVariant> {
    let scope_kind = input
        .scope_kind
        .parse::<ScopeKind>()
        .map_err(|_| AppError::validation("invalid_kind"))?;
    if input.workflow_key.trim().is_empty()
        || input.request_type.trim().is_empty()
        || input.name.trim().is_empty()
    {
        return Err(AppError::validation("missing_fields"));
    }
    let scope_value = input.scope_value.as_deref().map(str::trim).filter(|v| !v.is_empty());
    if scope_kind == ScopeKind::Dept && scope_value.is_none() {
        return Err(AppError::validation("missing_fields"));
    }

    let variant = WorkflowVariant {
        workflow_key: input.workflow_key.trim().to_string(),
        request_type: input.request_type.trim().to_string(),
        name: input.name.trim().to_string(),
        category: input.category.trim().to_string(),
        scope_kind,
        scope_value: scope_value.map(str::to_string),
        enabled: input.enabled,
        is_default: input.is_default,
        created_at: chrono::Utc::now(),
    };

    let mut tx = db.pool().begin().await?;
    workflow_repository::upsert_variant(&mut tx, &variant).await?;
    let stored = workflow_repository::get_variant(&mut tx, &variant.workflow_key)
        .await?
        .ok_or_else(|| AppError::Internal("variant upsert lost".to_string()))?;
    tx.commit().await?;
    info!("workflow variant upserted");
    Ok(stored)
}

/// Replace a variant's ordered step set wholesale.
#[instrument(skip(db, steps))]
pub async fn replace_steps(db: &DatabaseService, workflow_key: &str, steps: Vec<StepInput>) -> AppResult<()> {
    let mut validated = Vec::with_capacity(steps.len());
    for step in steps {
        let assignee_kind = step
            .assignee_kind
            .parse::<AssigneeKind>()
            .map_err(|_| AppError::validation("invalid_kind"))?;
        if step.step_key.trim().is_empty() {
            return Err(AppError::validation("missing_fields"));
        }
        validated.push(NewWorkflowStep {
            step_order: step.step_order,
            step_key: step.step_key.trim().to_string(),
            assignee_kind,
            assignee_value: step.assignee_value,
            condition_kind: step.condition_kind,
            condition_value: step.condition_value,
        });
    }

    let mut tx = db.pool().begin().await?;
    workflow_repository::replace_steps(&mut tx, workflow_key, &validated).await?;
    tx.commit().await?;
    info!(workflow_key, steps = validated.len(), "workflow steps replaced");
    Ok(())
}

/// Delete a variant (steps cascade). Live requests keep their dangling
/// key and fall back by request type.
#[instrument(skip(db))]
pub async fn delete_variant(db: &DatabaseService, workflow_key: &str) -> AppResult<()> {
    let mut tx = db.pool().begin().await?;
    workflow_repository::delete_variant(&mut tx, workflow_key).await?;
    tx.commit().await?;
    info!(workflow_key, "workflow variant deleted");
    Ok(())
}
