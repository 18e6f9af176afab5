use chrono::Utc;
use sqlx::SqliteConnection;

use crate::domain::entities::Delegation;
use crate::infrastructure::database::queries::delegations::*;
use crate::shared::AppResult;

/// Write the delegator's single delegation row. Deactivating stamps
/// `revoked_at`; activating clears it.
pub async fn set_delegation(
    conn: &mut SqliteConnection,
    delegator_user_id: i64,
    delegate_user_id: Option<i64>,
    active: bool,
) -> AppResult<()> {
    let now = Utc::now();
    let revoked_at = if active { None } else { Some(now) };
    sqlx::query(DELEGATION_UPSERT)
        .bind(delegator_user_id)
        .bind(delegate_user_id)
        .bind(active)
        .bind(now)
        .bind(revoked_at)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn get_delegation(
    conn: &mut SqliteConnection,
    delegator_user_id: i64,
) -> AppResult<Option<Delegation>> {
    let row = sqlx::query_as::<_, Delegation>(DELEGATION_FIND)
        .bind(delegator_user_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn is_active_delegate(
    conn: &mut SqliteConnection,
    delegator_user_id: i64,
    delegate_user_id: i64,
) -> AppResult<bool> {
    let row = sqlx::query_scalar::<_, i64>(DELEGATION_ACTIVE_EXISTS)
        .bind(delegator_user_id)
        .bind(delegate_user_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}
