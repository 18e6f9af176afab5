#![allow(dead_code)]

use approval_core::application::services::requests::RequestContent;
use approval_core::domain::entities::{RequestEvent, Task, TaskStatus};
use approval_core::infrastructure::database::DatabaseService;
use approval_core::infrastructure::repositories::{event_repository, task_repository};
use serde_json::Value;

pub fn content<'a>(title: &'a str, body: &'a str, payload: Option<&'a Value>) -> RequestContent<'a> {
    RequestContent { title, body, payload }
}

pub async fn request_tasks(db: &DatabaseService, request_id: i64) -> Vec<Task> {
    let mut conn = db.pool().acquire().await.unwrap();
    task_repository::list_request_tasks(&mut conn, request_id).await.unwrap()
}

pub async fn pending_tasks(db: &DatabaseService, request_id: i64) -> Vec<Task> {
    request_tasks(db, request_id)
        .await
        .into_iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .collect()
}

/// The single pending task of a request; panics when there is not exactly
/// one.
pub async fn sole_pending_task(db: &DatabaseService, request_id: i64) -> Task {
    let mut pending = pending_tasks(db, request_id).await;
    assert_eq!(pending.len(), 1, "expected exactly one pending task");
    pending.remove(0)
}

/// Pending task at a given step key; panics when absent.
pub async fn pending_task_for_step(db: &DatabaseService, request_id: i64, step_key: &str) -> Task {
    pending_tasks(db, request_id)
        .await
        .into_iter()
        .find(|t| t.step_key == step_key)
        .unwrap_or_else(|| panic!("no pending task for step {}", step_key))
}

pub async fn request_events(db: &DatabaseService, request_id: i64) -> Vec<RequestEvent> {
    let mut conn = db.pool().acquire().await.unwrap();
    event_repository::list_request_events(&mut conn, request_id).await.unwrap()
}

pub async fn event_types(db: &DatabaseService, request_id: i64) -> Vec<String> {
    request_events(db, request_id)
        .await
        .into_iter()
        .map(|e| e.event_type)
        .collect()
}

/// Event ids must be strictly increasing in insertion order.
pub async fn assert_event_ids_monotonic(db: &DatabaseService, request_id: i64) {
    let events = request_events(db, request_id).await;
    for pair in events.windows(2) {
        assert!(pair[0].id < pair[1].id, "event ids out of order");
    }
}
