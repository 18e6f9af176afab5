//! Task verb behaviors: authorization, idempotency, transfer, add-sign,
//! and the owner-level request operations.

mod common;

use approval_core::application::services::{requests, task_actions};
use approval_core::domain::entities::{RequestStatus, TaskDecision, TaskStatus};
use approval_core::shared::{AppError, ErrorKind};
use approval_core::testing::{factories, fixtures};

use common::*;

fn kind(err: &AppError) -> ErrorKind {
    ErrorKind::from(err)
}

#[tokio::test]
async fn deciding_a_decided_task_is_a_conflict() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();

    let request = requests::create_request(&db, &user, "generic", None, content("g", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;
    task_actions::decide_task(&db, &admin, task.id, TaskDecision::Approved, None)
        .await
        .unwrap();

    let err = task_actions::decide_task(&db, &admin, task.id, TaskDecision::Approved, None)
        .await
        .unwrap_err();
    assert_eq!(kind(&err), ErrorKind::Conflict);
    assert_eq!(err.code(), Some("task_already_decided"));

    // No state change: still exactly one approved task.
    let tasks = request_tasks(&db, request.id).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Approved);
}

#[tokio::test]
async fn unrelated_actor_cannot_decide() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    fixtures::add_user(&db, "mallory", "user", None, None).await.unwrap();
    let mallory = fixtures::actor_named(&db, "mallory").await.unwrap();

    let request = requests::create_request(&db, &user, "generic", None, content("g", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;

    let err = task_actions::decide_task(&db, &mallory, task.id, TaskDecision::Approved, None)
        .await
        .unwrap_err();
    assert_eq!(kind(&err), ErrorKind::Authorization);
    assert!(sole_pending_task(&db, request.id).await.is_pending());
}

#[tokio::test]
async fn role_holders_may_act_on_role_tasks() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    fixtures::add_user(&db, "second_admin", "admin", None, None).await.unwrap();
    let second_admin = fixtures::actor_named(&db, "second_admin").await.unwrap();

    // The generic step targets the admin role, not a specific user.
    let request = requests::create_request(&db, &user, "generic", None, content("g", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;
    assert_eq!(task.assignee_role.as_deref(), Some("admin"));

    let request = task_actions::decide_task(&db, &second_admin, task.id, TaskDecision::Approved, None)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Approved);
}

#[tokio::test]
async fn missing_task_is_not_found() {
    let db = fixtures::seeded_db().await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();
    let err = task_actions::decide_task(&db, &admin, 9999, TaskDecision::Approved, None)
        .await
        .unwrap_err();
    assert_eq!(kind(&err), ErrorKind::NotFound);
}

#[tokio::test]
async fn transfer_reassigns_without_deciding() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();
    fixtures::add_user(&db, "delegate", "user", None, None).await.unwrap();
    let delegate = fixtures::actor_named(&db, "delegate").await.unwrap();

    let request = requests::create_request(&db, &user, "leave", None, content("l", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;

    // Admin bypass applies to transfer.
    task_actions::transfer_task(&db, &admin, task.id, delegate.id).await.unwrap();

    let task = sole_pending_task(&db, request.id).await;
    assert_eq!(task.assignee_user_id, Some(delegate.id));
    assert!(task.assignee_role.is_none());
    assert!(task.is_pending());
    assert!(event_types(&db, request.id).await.iter().any(|t| t == "task_transferred"));

    let request = task_actions::decide_task(&db, &delegate, task.id, TaskDecision::Approved, None)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Approved);
}

#[tokio::test]
async fn transfer_has_no_bypass_for_non_admins() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    fixtures::add_user(&db, "rando", "user", None, None).await.unwrap();
    let rando = fixtures::actor_named(&db, "rando").await.unwrap();

    let request = requests::create_request(&db, &user, "leave", None, content("l", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;

    let err = task_actions::transfer_task(&db, &rando, task.id, rando.id).await.unwrap_err();
    assert_eq!(kind(&err), ErrorKind::Authorization);
}

#[tokio::test]
async fn transfer_to_unknown_user_is_not_found() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();

    let request = requests::create_request(&db, &user, "leave", None, content("l", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;
    let err = task_actions::transfer_task(&db, &admin, task.id, 424242).await.unwrap_err();
    assert_eq!(kind(&err), ErrorKind::NotFound);
}

#[tokio::test]
async fn add_sign_promotes_the_step_to_a_group() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();
    fixtures::add_user(&db, "cosigner", "user", None, None).await.unwrap();
    let cosigner = fixtures::actor_named(&db, "cosigner").await.unwrap();

    let request = requests::create_request(&db, &user, "leave", None, content("l", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;

    task_actions::add_sign(&db, &admin, task.id, cosigner.id).await.unwrap();
    let pending = pending_tasks(&db, request.id).await;
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|t| t.step_order == task.step_order));
    assert!(event_types(&db, request.id).await.iter().any(|t| t == "task_addsigned"));

    // First approval no longer completes the step.
    let request = task_actions::decide_task(&db, &admin, task.id, TaskDecision::Approved, None)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);

    let remaining = sole_pending_task(&db, request.id).await;
    let request = task_actions::decide_task(&db, &cosigner, remaining.id, TaskDecision::Approved, None)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Approved);
}

#[tokio::test]
async fn withdraw_is_owner_only_and_single_shot() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();

    let request = requests::create_request(&db, &user, "leave", None, content("l", "b", None))
        .await
        .unwrap();

    let err = requests::withdraw_request(&db, &admin, request.id).await.unwrap_err();
    assert_eq!(kind(&err), ErrorKind::Authorization);

    let request = requests::withdraw_request(&db, &user, request.id).await.unwrap();
    assert_eq!(request.status, RequestStatus::Withdrawn);
    assert!(pending_tasks(&db, request.id).await.is_empty());

    let err = requests::withdraw_request(&db, &user, request.id).await.unwrap_err();
    assert_eq!(kind(&err), ErrorKind::Conflict);
    assert_eq!(err.code(), Some("not_editable"));
}

#[tokio::test]
async fn void_is_admin_only() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();

    let request = requests::create_request(&db, &user, "leave", None, content("l", "b", None))
        .await
        .unwrap();

    let err = requests::void_request(&db, &user, request.id).await.unwrap_err();
    assert_eq!(kind(&err), ErrorKind::Authorization);

    let request = requests::void_request(&db, &admin, request.id).await.unwrap();
    assert_eq!(request.status, RequestStatus::Voided);
    assert!(pending_tasks(&db, request.id).await.is_empty());
    assert!(event_types(&db, request.id).await.iter().any(|t| t == "voided"));
}

#[tokio::test]
async fn resubmit_preconditions() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();

    let request = requests::create_request(&db, &user, "generic", None, content("g", "b", None))
        .await
        .unwrap();

    // Not in changes_requested yet.
    let err = requests::resubmit_request(&db, &user, request.id, content("x", "y", None))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("not_editable"));

    let task = sole_pending_task(&db, request.id).await;
    task_actions::return_for_changes(&db, &admin, task.id, Some("fix")).await.unwrap();

    // Only the owner may resubmit.
    let err = requests::resubmit_request(&db, &admin, request.id, content("x", "y", None))
        .await
        .unwrap_err();
    assert_eq!(kind(&err), ErrorKind::Authorization);

    // Missing fields are rejected before any state change.
    let err = requests::resubmit_request(&db, &user, request.id, content("", "", None))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("missing_fields"));
    assert_eq!(sole_pending_task(&db, request.id).await.step_key, "resubmit");
}

#[tokio::test]
async fn decided_tasks_carry_full_decision_metadata() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();

    let request = requests::create_request(&db, &user, "generic", None, content("g", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;
    assert!(task.decided_by.is_none() && task.decided_at.is_none());

    task_actions::decide_task(&db, &admin, task.id, TaskDecision::Rejected, Some("nope"))
        .await
        .unwrap();

    let task = request_tasks(&db, request.id).await.remove(0);
    assert_eq!(task.status, TaskStatus::Rejected);
    assert_eq!(task.decided_by, Some(admin.id));
    assert!(task.decided_at.is_some());
    assert_eq!(task.comment.as_deref(), Some("nope"));
}

#[tokio::test]
async fn actions_on_a_decided_request_conflict() {
    let db = fixtures::seeded_db().await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();
    fixtures::add_user(&db, "peer", "user", None, None).await.unwrap();
    let peer = fixtures::actor_named(&db, "peer").await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();

    factories::install_workflow(
        &db,
        "pair",
        vec![factories::step(1, "pair", "users_all", Some(&format!("{},{}", admin.id, peer.id)))],
    )
    .await
    .unwrap();

    let request = requests::create_request(&db, &user, "pair", None, content("p", "b", None))
        .await
        .unwrap();
    let peer_task = pending_tasks(&db, request.id)
        .await
        .into_iter()
        .find(|t| t.assignee_user_id == Some(peer.id))
        .unwrap();

    // Owner withdraws while tasks are still open.
    requests::withdraw_request(&db, &user, request.id).await.unwrap();

    let err = task_actions::decide_task(&db, &peer, peer_task.id, TaskDecision::Approved, None)
        .await
        .unwrap_err();
    // The withdraw canceled the task, so the verb reports the task state.
    assert_eq!(err.code(), Some("task_already_decided"));
}
