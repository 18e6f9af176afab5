use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a task. Created `pending`, terminates exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Approved,
    Rejected,
    Returned,
    Canceled,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Returned => write!(f, "returned"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "returned" => Ok(Self::Returned),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

/// The two decisions an approver can hand down on a pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskDecision {
    Approved,
    Rejected,
}

impl TaskDecision {
    pub fn as_status(self) -> TaskStatus {
        match self {
            Self::Approved => TaskStatus::Approved,
            Self::Rejected => TaskStatus::Rejected,
        }
    }
}

impl std::fmt::Display for TaskDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_status().fmt(f)
    }
}

/// One concrete unit of approval work, materialized for one step of one
/// request and targeted at a user or a role (exactly one of the two).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub request_id: i64,
    /// Position of the owning step within the workflow variant. `0` for the
    /// synthetic resubmit task; `None` only on legacy rows.
    pub step_order: Option<i64>,
    pub step_key: String,
    pub assignee_user_id: Option<i64>,
    pub assignee_role: Option<String>,
    pub status: TaskStatus,
    pub decided_by: Option<i64>,
    pub decided_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }
}
