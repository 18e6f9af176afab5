pub mod attachment;
pub mod delegation;
pub mod notification;
pub mod request;
pub mod request_event;
pub mod task;
pub mod user;
pub mod watcher;
pub mod workflow;

pub use attachment::Attachment;
pub use delegation::Delegation;
pub use notification::Notification;
pub use request::{Request, RequestStatus};
pub use request_event::{EventType, RequestEvent};
pub use task::{Task, TaskDecision, TaskStatus};
pub use user::User;
pub use watcher::{RequestWatcher, WatcherKind};
pub use workflow::{AssigneeKind, NewWorkflowStep, ScopeKind, WorkflowVariant, WorkflowVariantStep};
