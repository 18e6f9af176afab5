//! In-memory SQLite fixtures. The pool is pinned to one connection so a
//! `sqlite::memory:` database is shared by every acquisition.

use crate::domain::entities::User;
use crate::infrastructure::database::{create_pool, seed, DatabaseService};
use crate::infrastructure::repositories::user_repository::{self, NewUser};
use crate::shared::{Actor, AppError, AppResult};

/// Fresh in-memory database with the schema applied.
pub async fn memory_db() -> AppResult<DatabaseService> {
    let pool = create_pool("sqlite::memory:", 1).await?;
    let db = DatabaseService::new(pool);
    db.init().await?;
    Ok(db)
}

/// Schema plus the default catalog and the `admin`/`user` accounts,
/// matching the state the `setup` binary leaves behind.
pub async fn seeded_db() -> AppResult<DatabaseService> {
    let db = memory_db().await?;
    let mut tx = db.pool().begin().await?;
    seed::ensure_workflow_catalog(&mut tx).await?;
    seed::ensure_default_accounts(&mut tx).await?;
    tx.commit().await.map_err(AppError::Database)?;
    Ok(db)
}

/// Add a directory user and return it.
pub async fn add_user(
    db: &DatabaseService,
    username: &str,
    role: &str,
    dept: Option<&str>,
    manager_id: Option<i64>,
) -> AppResult<User> {
    let mut conn = db.pool().acquire().await?;
    let id = user_repository::create_user(
        &mut conn,
        NewUser {
            username,
            role,
            dept,
            manager_id,
            dept_id: None,
            position: None,
        },
    )
    .await?;
    user_repository::get_user_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::Internal("fixture user missing".to_string()))
}

/// The actor for an existing username.
pub async fn actor_named(db: &DatabaseService, username: &str) -> AppResult<Actor> {
    let mut conn = db.pool().acquire().await?;
    let user = user_repository::get_user_by_username(&mut conn, username)
        .await?
        .ok_or_else(|| AppError::not_found("user_not_found"))?;
    Ok(Actor::from(&user))
}
