//! Out-of-office delegation: one delegate per delegator, acting on their
//! user-assigned tasks while active.

use tracing::{info, instrument};

use crate::domain::entities::Delegation;
use crate::infrastructure::database::DatabaseService;
use crate::infrastructure::repositories::{delegation_repository, user_repository};
use crate::shared::{Actor, AppError, AppResult};

/// Set or clear the actor's delegation. `None` deactivates. Delegating to
/// yourself or to an unknown user is rejected.
#[instrument(skip(db, actor), fields(actor_id = actor.id))]
pub async fn set_delegation(
    db: &DatabaseService,
    actor: &Actor,
    delegate_user_id: Option<i64>,
) -> AppResult<()> {
    let mut tx = db.pool().begin().await?;
    match delegate_user_id {
        None => {
            delegation_repository::set_delegation(&mut tx, actor.id, None, false).await?;
            info!("delegation deactivated");
        }
        Some(delegate) => {
            if delegate == actor.id {
                return Err(AppError::validation("invalid_delegate"));
            }
            if user_repository::get_user_by_id(&mut tx, delegate).await?.is_none() {
                return Err(AppError::validation("invalid_delegate"));
            }
            delegation_repository::set_delegation(&mut tx, actor.id, Some(delegate), true).await?;
            info!(delegate, "delegation activated");
        }
    }
    tx.commit().await?;
    Ok(())
}

pub async fn get_delegation(db: &DatabaseService, actor: &Actor) -> AppResult<Option<Delegation>> {
    let mut conn = db.pool().acquire().await?;
    delegation_repository::get_delegation(&mut conn, actor.id).await
}
