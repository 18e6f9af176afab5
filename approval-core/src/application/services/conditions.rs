//! Step guard evaluation. Pure functions over the step row, the request's
//! canonical payload, and the creator's department.

use serde_json::{Map, Value};

use crate::domain::entities::WorkflowVariantStep;

/// Numeric payload field: JSON number or a numeric string.
fn number_field(payload: &Map<String, Value>, key: &str) -> Option<f64> {
    match payload.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer payload field; fractional JSON numbers truncate.
fn integer_field(payload: &Map<String, Value>, key: &str) -> Option<i64> {
    match payload.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Comma/semicolon separated list, lowercased, empties dropped.
fn lowered_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or("")
        .replace(';', ",")
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn threshold_f64(value: Option<&str>) -> Option<f64> {
    let raw = value.unwrap_or("");
    let raw = if raw.is_empty() { "0" } else { raw };
    raw.parse::<f64>().ok()
}

fn threshold_i64(value: Option<&str>) -> Option<i64> {
    let raw = value.unwrap_or("");
    let raw = if raw.is_empty() { "0" } else { raw };
    raw.parse::<i64>().ok()
}

/// Does this step's guard pass for the given request?
///
/// A step with no condition always passes. An unrecognized condition kind
/// also passes: the catalog may run ahead of this evaluator, and skipping
/// an unknown gate would silently drop a required approval.
pub fn step_condition_passes(
    step: &WorkflowVariantStep,
    payload: Option<&Map<String, Value>>,
    creator_dept: Option<&str>,
) -> bool {
    let kind = step
        .condition_kind
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());
    let Some(kind) = kind else {
        return true;
    };
    let value = step.condition_value.as_deref().map(str::trim);

    match kind {
        "min_amount" => {
            let Some(payload) = payload else { return false };
            match (number_field(payload, "amount"), threshold_f64(value)) {
                (Some(amount), Some(threshold)) => amount >= threshold,
                _ => false,
            }
        }
        "max_amount" => {
            let Some(payload) = payload else { return false };
            match (number_field(payload, "amount"), threshold_f64(value)) {
                (Some(amount), Some(threshold)) => amount <= threshold,
                _ => false,
            }
        }
        "min_days" => {
            let Some(payload) = payload else { return false };
            match (integer_field(payload, "days"), threshold_i64(value)) {
                (Some(days), Some(threshold)) => days >= threshold,
                _ => false,
            }
        }
        "dept_in" => {
            let Some(dept) = creator_dept.map(str::trim).filter(|d| !d.is_empty()) else {
                return false;
            };
            let allowed = lowered_list(value);
            !allowed.is_empty() && allowed.contains(&dept.to_lowercase())
        }
        "category_in" => {
            let Some(payload) = payload else { return false };
            let category = match payload.get("category") {
                Some(Value::String(s)) => s.trim().to_lowercase(),
                Some(other) => other.to_string().trim().to_lowercase(),
                None => String::new(),
            };
            let allowed = lowered_list(value);
            !allowed.is_empty() && allowed.contains(&category)
        }
        _ => true,
    }
}

/// The next materializable step: smallest order past `current_order` whose
/// condition passes. Steps with failing guards are skipped outright.
pub fn find_next_step<'a>(
    steps: &'a [WorkflowVariantStep],
    current_order: Option<i64>,
    payload: Option<&Map<String, Value>>,
    creator_dept: Option<&str>,
) -> Option<&'a WorkflowVariantStep> {
    steps
        .iter()
        .filter(|step| current_order.map_or(true, |order| step.step_order > order))
        .find(|step| step_condition_passes(step, payload, creator_dept))
}
