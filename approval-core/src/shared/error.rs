use thiserror::Error;

/// Engine-level error. The string carried by each variant is the stable
/// machine-readable code the boundary reports verbatim (for example
/// `task_already_decided` or `invalid_workflow`).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound(code.into())
    }

    pub fn not_authorized() -> Self {
        Self::Authorization("not_authorized".to_string())
    }

    pub fn conflict(code: impl Into<String>) -> Self {
        Self::Conflict(code.into())
    }

    pub fn validation(code: impl Into<String>) -> Self {
        Self::Validation(code.into())
    }

    /// The stable code for this error, when one applies.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Database(_) => None,
            Self::NotFound(code)
            | Self::Authorization(code)
            | Self::Conflict(code)
            | Self::Validation(code)
            | Self::Storage(code)
            | Self::Internal(code) => Some(code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Database,
    NotFound,
    Authorization,
    Conflict,
    Validation,
    Storage,
    Internal,
}

impl From<&AppError> for ErrorKind {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Database(_) => ErrorKind::Database,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Authorization(_) => ErrorKind::Authorization,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Storage(_) => ErrorKind::Storage,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}
