use crate::shared::error::AppError;

pub type AppResult<T> = Result<T, AppError>;
