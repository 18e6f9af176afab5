use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit event types written by the engine. The on-disk column is free
/// text, so reads keep the raw string; this enum is the closed set the
/// engine itself emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Created,
    TaskCreated,
    TaskDecided,
    TaskReturned,
    TaskTransferred,
    TaskAddsigned,
    ChangesRequested,
    Resubmitted,
    Withdrawn,
    Voided,
    RequestApproved,
    RequestRejected,
}

impl EventType {
    /// Whether appending this event fans notifications out to the owner and
    /// watchers. The rest of the set is audit-only.
    pub fn notifies(self) -> bool {
        matches!(
            self,
            Self::ChangesRequested
                | Self::Resubmitted
                | Self::Withdrawn
                | Self::Voided
                | Self::RequestApproved
                | Self::RequestRejected
                | Self::TaskTransferred
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::TaskCreated => "task_created",
            Self::TaskDecided => "task_decided",
            Self::TaskReturned => "task_returned",
            Self::TaskTransferred => "task_transferred",
            Self::TaskAddsigned => "task_addsigned",
            Self::ChangesRequested => "changes_requested",
            Self::Resubmitted => "resubmitted",
            Self::Withdrawn => "withdrawn",
            Self::Voided => "voided",
            Self::RequestApproved => "request_approved",
            Self::RequestRejected => "request_rejected",
        };
        write!(f, "{}", s)
    }
}

/// Append-only audit line on a request. Row ids encode the causal order of
/// mutations on the request.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RequestEvent {
    pub id: i64,
    pub request_id: i64,
    pub event_type: String,
    pub actor_user_id: Option<i64>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}
