//! Notification fan-out rules and the inbox/delegation read models.

mod common;

use approval_core::application::services::{delegations, requests, task_actions};
use approval_core::domain::entities::TaskDecision;
use approval_core::infrastructure::repositories::{notification_repository, task_repository};
use approval_core::testing::fixtures;

use common::*;

async fn notifications_for(db: &approval_core::infrastructure::database::DatabaseService, user_id: i64) -> Vec<approval_core::domain::entities::Notification> {
    let mut conn = db.pool().acquire().await.unwrap();
    notification_repository::list_notifications(&mut conn, user_id, 200).await.unwrap()
}

#[tokio::test]
async fn final_approval_notifies_owner_and_watchers_but_not_the_actor() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();
    let w1 = fixtures::add_user(&db, "watcher1", "user", None, None).await.unwrap();
    let w2 = fixtures::add_user(&db, "watcher2", "user", None, None).await.unwrap();

    let request = requests::create_request(&db, &user, "generic", None, content("g", "b", None))
        .await
        .unwrap();
    requests::add_watchers(&db, &user, request.id, "cc", &[w1.id, w2.id]).await.unwrap();
    // Duplicate registration is ignored.
    requests::add_watchers(&db, &user, request.id, "cc", &[w1.id]).await.unwrap();

    let task = sole_pending_task(&db, request.id).await;
    task_actions::decide_task(&db, &admin, task.id, TaskDecision::Approved, None)
        .await
        .unwrap();

    for recipient in [user.id, w1.id, w2.id] {
        let rows = notifications_for(&db, recipient).await;
        assert_eq!(rows.len(), 1, "recipient {} should have one notification", recipient);
        assert_eq!(rows[0].event_type, "request_approved");
        assert!(rows[0].read_at.is_none());
    }
    // The deciding admin notifies nobody about their own action.
    assert!(notifications_for(&db, admin.id).await.is_empty());
}

#[tokio::test]
async fn audit_only_events_do_not_notify() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();

    let request = requests::create_request(&db, &user, "expense", None, content("e", "b", None))
        .await
        .unwrap();
    // created + task_created already happened; neither notifies.
    assert!(notifications_for(&db, user.id).await.is_empty());
    assert!(event_types(&db, request.id).await.iter().any(|t| t == "task_created"));
}

#[tokio::test]
async fn owner_is_not_notified_of_their_own_withdraw() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let w1 = fixtures::add_user(&db, "onlooker", "user", None, None).await.unwrap();

    let request = requests::create_request(&db, &user, "generic", None, content("g", "b", None))
        .await
        .unwrap();
    requests::add_watchers(&db, &user, request.id, "follow", &[w1.id]).await.unwrap();

    requests::withdraw_request(&db, &user, request.id).await.unwrap();

    assert!(notifications_for(&db, user.id).await.is_empty());
    let rows = notifications_for(&db, w1.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_type, "withdrawn");
}

#[tokio::test]
async fn return_notifies_the_owner_with_the_comment() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();

    let request = requests::create_request(&db, &user, "generic", None, content("g", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;
    task_actions::return_for_changes(&db, &admin, task.id, Some("fix the dates"))
        .await
        .unwrap();

    let rows = notifications_for(&db, user.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_type, "changes_requested");
    assert_eq!(rows[0].message.as_deref(), Some("fix the dates"));
    assert_eq!(rows[0].actor_user_id, Some(admin.id));
}

#[tokio::test]
async fn transfer_notifies_the_owner() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();
    let target = fixtures::add_user(&db, "target", "user", None, None).await.unwrap();

    let request = requests::create_request(&db, &user, "leave", None, content("l", "b", None))
        .await
        .unwrap();
    let task = sole_pending_task(&db, request.id).await;
    task_actions::transfer_task(&db, &admin, task.id, target.id).await.unwrap();

    let rows = notifications_for(&db, user.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_type, "task_transferred");
}

#[tokio::test]
async fn mark_read_is_idempotent_and_owner_scoped() {
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

    let note = notifications_for(&db, user.id).await.remove(0);
    let mut conn = db.pool().acquire().await.unwrap();
    assert!(notification_repository::mark_notification_read(&mut conn, note.id, user.id).await.unwrap());
    // Second mark: still true, row exists and stays read.
    assert!(notification_repository::mark_notification_read(&mut conn, note.id, user.id).await.unwrap());
    // Someone else's id does not see the row.
    assert!(!notification_repository::mark_notification_read(&mut conn, note.id, admin.id).await.unwrap());
    drop(conn);

    let rows = notifications_for(&db, user.id).await;
    assert!(rows[0].read_at.is_some());
}

#[tokio::test]
async fn inbox_shows_direct_role_and_delegated_tasks() {
    let db = fixtures::seeded_db().await.unwrap();
    let user = fixtures::actor_named(&db, "user").await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();
    fixtures::add_user(&db, "deputy", "user", None, None).await.unwrap();
    let deputy = fixtures::actor_named(&db, "deputy").await.unwrap();

    // leave -> manager task assigned to admin directly;
    // generic -> role-admin task.
    let direct = requests::create_request(&db, &user, "leave", None, content("l", "b", None))
        .await
        .unwrap();
    let role_based = requests::create_request(&db, &user, "generic", None, content("g", "b", None))
        .await
        .unwrap();

    let mut conn = db.pool().acquire().await.unwrap();
    let inbox = task_repository::list_inbox_tasks(&mut conn, admin.id, &admin.role).await.unwrap();
    let request_ids: Vec<i64> = inbox.iter().map(|t| t.request_id).collect();
    assert!(request_ids.contains(&direct.id));
    assert!(request_ids.contains(&role_based.id));
    drop(conn);

    // The deputy sees nothing until the admin delegates.
    let mut conn = db.pool().acquire().await.unwrap();
    let inbox = task_repository::list_inbox_tasks(&mut conn, deputy.id, &deputy.role).await.unwrap();
    assert!(inbox.is_empty());
    drop(conn);

    delegations::set_delegation(&db, &admin, Some(deputy.id)).await.unwrap();
    let mut conn = db.pool().acquire().await.unwrap();
    let inbox = task_repository::list_inbox_tasks(&mut conn, deputy.id, &deputy.role).await.unwrap();
    // Delegation covers the user-assigned task, not the role-assigned one.
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].request_id, direct.id);
    drop(conn);

    // Deactivating the delegation empties the deputy's inbox again.
    delegations::set_delegation(&db, &admin, None).await.unwrap();
    let mut conn = db.pool().acquire().await.unwrap();
    let inbox = task_repository::list_inbox_tasks(&mut conn, deputy.id, &deputy.role).await.unwrap();
    assert!(inbox.is_empty());
}

#[tokio::test]
async fn self_delegation_is_rejected() {
    let db = fixtures::seeded_db().await.unwrap();
    let admin = fixtures::actor_named(&db, "admin").await.unwrap();

    let err = delegations::set_delegation(&db, &admin, Some(admin.id)).await.unwrap_err();
    assert_eq!(err.code(), Some("invalid_delegate"));
    let err = delegations::set_delegation(&db, &admin, Some(555)).await.unwrap_err();
    assert_eq!(err.code(), Some("invalid_delegate"));

    assert!(delegations::get_delegation(&db, &admin).await.unwrap().is_none());
}
