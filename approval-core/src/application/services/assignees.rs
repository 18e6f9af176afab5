//! Assignee resolution and task materialization for one workflow step.

use sqlx::SqliteConnection;

use crate::domain::entities::{AssigneeKind, WorkflowVariantStep};
use crate::infrastructure::repositories::{task_repository, user_repository};
use crate::shared::{Actor, AppResult};

/// `assignee_value` spellings that expand a group step to the whole
/// directory (minus the creator).
const EVERYONE: &[&str] = &["all", "*", "everyone"];

/// Resolve a singleton step to its `(user, role)` target. Falls back to
/// role `admin` whenever the configured target cannot be resolved, so a
/// misconfigured step still lands in somebody's inbox.
pub fn resolve_assignee(creator: &Actor, step: &WorkflowVariantStep) -> (Option<i64>, Option<String>) {
    let value = step
        .assignee_value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());
    match step.assignee_kind {
        AssigneeKind::Manager => match creator.manager_id {
            Some(manager_id) => (Some(manager_id), None),
            None => (None, Some("admin".to_string())),
        },
        AssigneeKind::Role => (None, Some(value.unwrap_or("admin").to_string())),
        AssigneeKind::User => match value.and_then(|v| v.parse::<i64>().ok()) {
            Some(user_id) => (Some(user_id), None),
            None => (None, Some("admin".to_string())),
        },
        // Group kinds are fanned out per member by the materializer.
        AssigneeKind::UsersAll | AssigneeKind::UsersAny => (None, Some("admin".to_string())),
    }
}

/// Comma/semicolon separated user id list, deduplicated, order preserved.
pub fn parse_user_id_list(value: Option<&str>) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    value
        .unwrap_or("")
        .replace(';', ",")
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse::<i64>().ok())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Create the pending task row(s) for a step and return its step key.
///
/// Group steps get one task per member; an expansion that comes up empty
/// falls back to a single role-`admin` task so the workflow never stalls.
pub async fn create_tasks_for_step(
    conn: &mut SqliteConnection,
    request_id: i64,
    creator: &Actor,
    step: &WorkflowVariantStep,
) -> AppResult<String> {
    let step_order = Some(step.step_order);
    let step_key = step.step_key.clone();

    if step.assignee_kind.is_group() {
        let value = step
            .assignee_value
            .as_deref()
            .map(str::trim)
            .unwrap_or("");
        let user_ids = if EVERYONE.contains(&value.to_lowercase().as_str()) {
            user_repository::list_users(&mut *conn)
                .await?
                .into_iter()
                .map(|u| u.id)
                .filter(|id| *id != creator.id)
                .collect()
        } else {
            parse_user_id_list(Some(value))
        };

        if user_ids.is_empty() {
            task_repository::create_task(conn, request_id, step_order, &step_key, None, Some("admin")).await?;
            return Ok(step_key);
        }
        for user_id in user_ids {
            task_repository::create_task(&mut *conn, request_id, step_order, &step_key, Some(user_id), None)
                .await?;
        }
        return Ok(step_key);
    }

    let (assignee_user_id, assignee_role) = resolve_assignee(creator, step);
    task_repository::create_task(
        conn,
        request_id,
        step_order,
        &step_key,
        assignee_user_id,
        assignee_role.as_deref(),
    )
    .await?;
    Ok(step_key)
}
