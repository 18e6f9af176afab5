//! Catalog factories for tests: build variants and steps with less noise.

use crate::application::services::catalog::{self, StepInput, VariantInput};
use crate::infrastructure::database::DatabaseService;
use crate::shared::AppResult;

pub fn step(step_order: i64, step_key: &str, assignee_kind: &str, assignee_value: Option<&str>) -> StepInput {
    StepInput {
        step_order,
        step_key: step_key.to_string(),
        assignee_kind: assignee_kind.to_string(),
        assignee_value: assignee_value.map(str::to_string),
        condition_kind: None,
        condition_value: None,
    }
}

pub fn conditional_step(
    step_order: i64,
    step_key: &str,
    assignee_kind: &str,
    assignee_value: Option<&str>,
    condition_kind: &str,
    condition_value: &str,
) -> StepInput {
    StepInput {
        condition_kind: Some(condition_kind.to_string()),
        condition_value: Some(condition_value.to_string()),
        ..step(step_order, step_key, assignee_kind, assignee_value)
    }
}

/// Install (or overwrite) a global default variant with the given steps.
pub async fn install_workflow(
    db: &DatabaseService,
    workflow_key: &str,
    steps: Vec<StepInput>,
) -> AppResult<()> {
    catalog::upsert_variant(
        db,
        VariantInput {
            workflow_key: workflow_key.to_string(),
            request_type: workflow_key.to_string(),
            name: workflow_key.to_string(),
            category: "General".to_string(),
            scope_kind: "global".to_string(),
            scope_value: None,
            enabled: true,
            is_default: true,
        },
    )
    .await?;
    catalog::replace_steps(db, workflow_key, steps).await
}
