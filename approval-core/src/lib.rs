pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod testing;

pub use config::Settings;
pub use shared::{Actor, AppError, AppResult, ErrorKind};
