use chrono::Utc;
use sqlx::SqliteConnection;

use crate::domain::entities::User;
use crate::infrastructure::database::queries::users::*;
use crate::shared::AppResult;

pub struct NewUser<'a> {
    pub username: &'a str,
    pub role: &'a str,
    pub dept: Option<&'a str>,
    pub manager_id: Option<i64>,
    pub dept_id: Option<i64>,
    pub position: Option<&'a str>,
}

pub async fn create_user(conn: &mut SqliteConnection, user: NewUser<'_>) -> AppResult<i64> {
    let result = sqlx::query(USER_INSERT)
        .bind(user.username)
        .bind(user.role)
        .bind(user.dept)
        .bind(user.manager_id)
        .bind(user.dept_id)
        .bind(user.position)
        .bind(Utc::now())
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_user_by_id(conn: &mut SqliteConnection, user_id: i64) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(USER_FIND_BY_ID)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn get_user_by_username(conn: &mut SqliteConnection, username: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(USER_FIND_BY_USERNAME)
        .bind(username)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn list_users(conn: &mut SqliteConnection) -> AppResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(USERS_LIST).fetch_all(conn).await?;
    Ok(users)
}

/// Full-profile write; callers load the user and merge changes first.
pub async fn update_user_profile(conn: &mut SqliteConnection, user: &User) -> AppResult<()> {
    sqlx::query(USER_UPDATE_PROFILE)
        .bind(user.dept.as_deref())
        .bind(user.manager_id)
        .bind(user.role.as_str())
        .bind(user.dept_id)
        .bind(user.position.as_deref())
        .bind(user.id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn count_users(conn: &mut SqliteConnection) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(USER_COUNT).fetch_one(conn).await?;
    Ok(count)
}
