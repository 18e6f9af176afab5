//! Persistence functions over `&mut SqliteConnection`.
//!
//! Engine operations span several reads and writes that must land in one
//! transaction, so these take the caller's connection instead of owning a
//! pool handle; the application services begin and commit.

pub mod attachment_repository;
pub mod delegation_repository;
pub mod event_repository;
pub mod notification_repository;
pub mod request_repository;
pub mod task_repository;
pub mod user_repository;
pub mod watcher_repository;
pub mod workflow_repository;
