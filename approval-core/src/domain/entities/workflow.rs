use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a step picks its task targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeKind {
    /// The request creator's manager; falls back to role `admin` when the
    /// creator has none.
    Manager,
    /// Everyone holding the role named by `assignee_value`.
    Role,
    /// The single user id in `assignee_value`.
    User,
    /// One task per listed user; the step completes when all approve.
    UsersAll,
    /// One task per listed user; the first approval wins.
    UsersAny,
}

impl AssigneeKind {
    pub fn is_group(self) -> bool {
        matches!(self, Self::UsersAll | Self::UsersAny)
    }
}

impl std::fmt::Display for AssigneeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manager => write!(f, "manager"),
            Self::Role => write!(f, "role"),
            Self::User => write!(f, "user"),
            Self::UsersAll => write!(f, "users_all"),
            Self::UsersAny => write!(f, "users_any"),
        }
    }
}

impl std::str::FromStr for AssigneeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "role" => Ok(Self::Role),
            "user" => Ok(Self::User),
            "users_all" => Ok(Self::UsersAll),
            "users_any" => Ok(Self::UsersAny),
            _ => Err(format!("Unknown assignee kind: {}", s)),
        }
    }
}

/// Visibility scope of a workflow variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Global,
    /// Only offered (and only defaulted) for creators whose dept equals
    /// `scope_value`.
    Dept,
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Dept => write!(f, "dept"),
        }
    }
}

impl std::str::FromStr for ScopeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "dept" => Ok(Self::Dept),
            _ => Err(format!("Unknown scope kind: {}", s)),
        }
    }
}

/// A named, ordered approval route for one request type. Several variants
/// may exist per request type (global plus per-department).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowVariant {
    pub workflow_key: String,
    pub request_type: String,
    pub name: String,
    pub category: String,
    pub scope_kind: ScopeKind,
    pub scope_value: Option<String>,
    pub enabled: bool,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// One position in a variant.
///
/// `condition_kind` stays a raw string: the catalog may be authored ahead
/// of this evaluator, and an unrecognized guard must include the step
/// rather than silently skip an approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowVariantStep {
    pub workflow_key: String,
    pub step_order: i64,
    pub step_key: String,
    pub assignee_kind: AssigneeKind,
    pub assignee_value: Option<String>,
    pub condition_kind: Option<String>,
    pub condition_value: Option<String>,
}

/// Step definition as submitted to the catalog, before it belongs to a
/// variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkflowStep {
    pub step_order: i64,
    pub step_key: String,
    pub assignee_kind: AssigneeKind,
    pub assignee_value: Option<String>,
    pub condition_kind: Option<String>,
    pub condition_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn assignee_kind_uses_canonical_tags() {
        assert_eq!(AssigneeKind::from_str("users_any").unwrap(), AssigneeKind::UsersAny);
        assert_eq!(AssigneeKind::UsersAll.to_string(), "users_all");
        assert!(AssigneeKind::from_str("committee").is_err());
    }

    #[test]
    fn group_kinds() {
        assert!(AssigneeKind::UsersAll.is_group());
        assert!(AssigneeKind::UsersAny.is_group());
        assert!(!AssigneeKind::Manager.is_group());
    }
}
