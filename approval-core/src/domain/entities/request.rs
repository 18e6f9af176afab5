use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle state of a request. Created `pending`, may cycle through
/// `changes_requested` ⇄ `pending` via return + resubmit, and terminates at
/// exactly one of the four terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    ChangesRequested,
    Approved,
    Rejected,
    Withdrawn,
    Voided,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Approved | Self::Rejected | Self::Withdrawn | Self::Voided
        )
    }

    /// Whether the owner may still withdraw (or an admin void) the request.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Pending | Self::ChangesRequested)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::ChangesRequested => write!(f, "changes_requested"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Withdrawn => write!(f, "withdrawn"),
            Self::Voided => write!(f, "voided"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "changes_requested" => Ok(Self::ChangesRequested),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "withdrawn" => Ok(Self::Withdrawn),
            "voided" => Ok(Self::Voided),
            _ => Err(format!("Unknown request status: {}", s)),
        }
    }
}

/// A user-submitted approval artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: i64,
    pub user_id: i64,
    pub request_type: String,
    /// The workflow variant this request was routed through. Nullable on
    /// legacy rows; variants may also be deleted out from under live rows,
    /// in which case the engine falls back by request type.
    pub workflow_key: Option<String>,
    pub title: String,
    pub body: String,
    /// Canonical payload, decoded from stored JSON on read. `None` when the
    /// request carries no payload or the stored text is not a JSON object.
    pub payload: Option<Value>,
    pub status: RequestStatus,
    pub decided_by: Option<i64>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Request {
    /// The payload as an object map, when there is one. Condition
    /// evaluation only ever looks at object payloads.
    pub fn payload_object(&self) -> Option<&serde_json::Map<String, Value>> {
        self.payload.as_ref().and_then(Value::as_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::ChangesRequested,
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Withdrawn,
            RequestStatus::Voided,
        ] {
            assert_eq!(RequestStatus::from_str(&status.to_string()).unwrap(), status);
        }
    }

    #[test]
    fn terminal_states_are_not_editable() {
        assert!(RequestStatus::Pending.is_editable());
        assert!(RequestStatus::ChangesRequested.is_editable());
        for status in [
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Withdrawn,
            RequestStatus::Voided,
        ] {
            assert!(status.is_terminal());
            assert!(!status.is_editable());
        }
    }
}
