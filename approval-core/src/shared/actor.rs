// Authenticated actor context
// Supplied by the boundary on every engine invocation; the engine never
// authenticates on its own.

use serde::{Deserialize, Serialize};

use crate::domain::entities::User;

/// The authenticated user an operation runs as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub dept: Option<String>,
    pub manager_id: Option<i64>,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            dept: user.dept.clone(),
            manager_id: user.manager_id,
        }
    }
}
