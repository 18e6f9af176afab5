//! SQL statements, grouped per table. Repository functions bind these with
//! runtime-checked queries so the crate builds without a live database.

pub mod attachments;
pub mod delegations;
pub mod events;
pub mod notifications;
pub mod requests;
pub mod tasks;
pub mod users;
pub mod watchers;
pub mod workflows;
