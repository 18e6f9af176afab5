use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a watcher got onto a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatcherKind {
    /// Carbon-copied by the owner or an admin.
    Cc,
    /// Self-subscribed.
    Follow,
}

impl std::fmt::Display for WatcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cc => write!(f, "cc"),
            Self::Follow => write!(f, "follow"),
        }
    }
}

impl std::str::FromStr for WatcherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cc" => Ok(Self::Cc),
            "follow" => Ok(Self::Follow),
            _ => Err(format!("Unknown watcher kind: {}", s)),
        }
    }
}

/// Notification recipient registered on a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestWatcher {
    pub request_id: i64,
    pub user_id: i64,
    pub kind: WatcherKind,
    pub created_at: DateTime<Utc>,
}
