//! Audit trail plus the notification fan-out derived from it. Both writes
//! happen in the caller's transaction, so an event and its notifications
//! are never visible apart.

use std::collections::BTreeSet;

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::domain::entities::EventType;
use crate::infrastructure::repositories::{
    event_repository, notification_repository, request_repository, watcher_repository,
};
use crate::shared::AppResult;

/// Append an audit event; qualifying event types additionally fan one
/// notification row out to each recipient.
pub async fn record_request_event(
    conn: &mut SqliteConnection,
    request_id: i64,
    event_type: EventType,
    actor_user_id: Option<i64>,
    message: Option<&str>,
) -> AppResult<()> {
    let now = Utc::now();
    let type_name = event_type.to_string();
    event_repository::insert_event(&mut *conn, request_id, &type_name, actor_user_id, message, now).await?;

    if !event_type.notifies() {
        return Ok(());
    }

    let owner = request_repository::get_request_owner(&mut *conn, request_id).await?;
    let watchers = watcher_repository::watcher_user_ids(&mut *conn, request_id).await?;
    for user_id in notification_recipients(&watchers, owner, actor_user_id) {
        notification_repository::insert_notification(
            &mut *conn,
            user_id,
            request_id,
            &type_name,
            actor_user_id,
            message,
            now,
        )
        .await?;
    }
    Ok(())
}

/// Watchers plus the owner, minus the actor, deduplicated and in
/// ascending user id order for deterministic insertion.
fn notification_recipients(watchers: &[i64], owner: Option<i64>, actor: Option<i64>) -> Vec<i64> {
    let mut recipients: BTreeSet<i64> = watchers.iter().copied().collect();
    if let Some(owner) = owner {
        recipients.insert(owner);
    }
    if let Some(actor) = actor {
        recipients.remove(&actor);
    }
    recipients.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipients_are_sorted_deduped_and_exclude_the_actor() {
        assert_eq!(
            notification_recipients(&[5, 2, 5, 9], Some(1), Some(5)),
            vec![1, 2, 9]
        );
    }

    #[test]
    fn owner_alone_when_no_watchers() {
        assert_eq!(notification_recipients(&[], Some(4), None), vec![4]);
        assert_eq!(notification_recipients(&[], Some(4), Some(4)), Vec::<i64>::new());
    }
}
