pub mod actor;
pub mod error;
pub mod result;

pub use actor::Actor;
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
