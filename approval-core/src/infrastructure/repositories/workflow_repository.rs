use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::domain::entities::workflow::NewWorkflowStep;
use crate::domain::entities::{AssigneeKind, ScopeKind, WorkflowVariant, WorkflowVariantStep};
use crate::infrastructure::database::queries::workflows::*;
use crate::shared::{AppError, AppResult};

#[derive(sqlx::FromRow)]
struct VariantRow {
    workflow_key: String,
    request_type: String,
    name: String,
    category: String,
    scope_kind: String,
    scope_value: Option<String>,
    enabled: bool,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<VariantRow> for WorkflowVariant {
    type Error = AppError;

    fn try_from(row: VariantRow) -> Result<Self, Self::Error> {
        let scope_kind = row.scope_kind.parse::<ScopeKind>().map_err(AppError::Internal)?;
        Ok(WorkflowVariant {
            workflow_key: row.workflow_key,
            request_type: row.request_type,
            name: row.name,
            category: row.category,
            scope_kind,
            scope_value: row.scope_value,
            enabled: row.enabled,
            is_default: row.is_default,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StepRow {
    workflow_key: String,
    step_order: i64,
    step_key: String,
    assignee_kind: String,
    assignee_value: Option<String>,
    condition_kind: Option<String>,
    condition_value: Option<String>,
}

impl TryFrom<StepRow> for WorkflowVariantStep {
    type Error = AppError;

    fn try_from(row: StepRow) -> Result<Self, Self::Error> {
        let assignee_kind = row
            .assignee_kind
            .parse::<AssigneeKind>()
            .map_err(AppError::Internal)?;
        Ok(WorkflowVariantStep {
            workflow_key: row.workflow_key,
            step_order: row.step_order,
            step_key: row.step_key,
            assignee_kind,
            assignee_value: row.assignee_value,
            condition_kind: row.condition_kind,
            condition_value: row.condition_value,
        })
    }
}

pub async fn get_variant(
    conn: &mut SqliteConnection,
    workflow_key: &str,
) -> AppResult<Option<WorkflowVariant>> {
    let row = sqlx::query_as::<_, VariantRow>(VARIANT_FIND_BY_KEY)
        .bind(workflow_key)
        .fetch_optional(conn)
        .await?;
    row.map(WorkflowVariant::try_from).transpose()
}

/// Enabled variants visible to a creator, stably ordered by (category, name).
pub async fn list_available_variants(
    conn: &mut SqliteConnection,
    dept: Option<&str>,
) -> AppResult<Vec<WorkflowVariant>> {
    let rows = match dept {
        Some(dept) => {
            sqlx::query_as::<_, VariantRow>(VARIANTS_AVAILABLE_FOR_DEPT)
                .bind(dept)
                .fetch_all(conn)
                .await?
        }
        None => {
            sqlx::query_as::<_, VariantRow>(VARIANTS_AVAILABLE_GLOBAL)
                .fetch_all(conn)
                .await?
        }
    };
    rows.into_iter().map(WorkflowVariant::try_from).collect()
}

pub async fn list_all_variants(conn: &mut SqliteConnection) -> AppResult<Vec<WorkflowVariant>> {
    let rows = sqlx::query_as::<_, VariantRow>(VARIANTS_LIST_ALL)
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(WorkflowVariant::try_from).collect()
}

/// Insert or update a variant. When it is flagged default, competing
/// defaults in the same (request_type, scope) are cleared in the same
/// transaction, so at most one default survives per scope.
pub async fn upsert_variant(conn: &mut SqliteConnection, variant: &WorkflowVariant) -> AppResult<()> {
    sqlx::query(VARIANT_UPSERT)
        .bind(variant.workflow_key.as_str())
        .bind(variant.request_type.as_str())
        .bind(variant.name.as_str())
        .bind(variant.category.as_str())
        .bind(variant.scope_kind.to_string())
        .bind(variant.scope_value.as_deref())
        .bind(variant.enabled)
        .bind(variant.is_default)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

    if variant.is_default {
        match variant.scope_kind {
            ScopeKind::Dept => {
                sqlx::query(VARIANT_CLEAR_DEFAULT_DEPT)
                    .bind(variant.request_type.as_str())
                    .bind(variant.scope_value.as_deref())
                    .bind(variant.workflow_key.as_str())
                    .execute(conn)
                    .await?;
            }
            ScopeKind::Global => {
                sqlx::query(VARIANT_CLEAR_DEFAULT_GLOBAL)
                    .bind(variant.request_type.as_str())
                    .bind(variant.workflow_key.as_str())
                    .execute(conn)
                    .await?;
            }
        }
    }
    Ok(())
}

/// Wipe and reinsert the ordered step set of one variant.
pub async fn replace_steps(
    conn: &mut SqliteConnection,
    workflow_key: &str,
    steps: &[NewWorkflowStep],
) -> AppResult<()> {
    sqlx::query(STEPS_DELETE_FOR_KEY)
        .bind(workflow_key)
        .execute(&mut *conn)
        .await?;
    let now = Utc::now();
    for step in steps {
        sqlx::query(STEP_INSERT)
            .bind(workflow_key)
            .bind(step.step_order)
            .bind(step.step_key.as_str())
            .bind(step.assignee_kind.to_string())
            .bind(step.assignee_value.as_deref())
            .bind(step.condition_kind.as_deref())
            .bind(step.condition_value.as_deref())
            .bind(now)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Deleting cascades to steps. Requests keep their dangling workflow_key;
/// the engine's fallback chain covers them.
pub async fn delete_variant(conn: &mut SqliteConnection, workflow_key: &str) -> AppResult<()> {
    sqlx::query(VARIANT_DELETE)
        .bind(workflow_key)
        .execute(conn)
        .await?;
    Ok(())
}

/// The default variant for (request_type, dept): dept-scoped default first,
/// then the global default.
pub async fn resolve_default_workflow_key(
    conn: &mut SqliteConnection,
    request_type: &str,
    dept: Option<&str>,
) -> AppResult<Option<String>> {
    if let Some(dept) = dept {
        let key = sqlx::query_scalar::<_, String>(VARIANT_DEFAULT_FOR_DEPT)
            .bind(request_type)
            .bind(dept)
            .fetch_optional(&mut *conn)
            .await?;
        if key.is_some() {
            return Ok(key);
        }
    }
    let key = sqlx::query_scalar::<_, String>(VARIANT_DEFAULT_GLOBAL)
        .bind(request_type)
        .fetch_optional(conn)
        .await?;
    Ok(key)
}

pub async fn list_steps(
    conn: &mut SqliteConnection,
    workflow_key: &str,
) -> AppResult<Vec<WorkflowVariantStep>> {
    let rows = sqlx::query_as::<_, StepRow>(STEPS_FOR_KEY)
        .bind(workflow_key)
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(WorkflowVariantStep::try_from).collect()
}

pub async fn variant_count(conn: &mut SqliteConnection) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(VARIANT_COUNT).fetch_one(conn).await?;
    Ok(count)
}

pub async fn steps_exist(conn: &mut SqliteConnection, workflow_key: &str) -> AppResult<bool> {
    let row = sqlx::query_scalar::<_, i64>(STEPS_EXIST_FOR_KEY)
        .bind(workflow_key)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}
