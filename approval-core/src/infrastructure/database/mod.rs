pub mod queries;
pub mod schema;
pub mod seed;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::shared::{AppError, AppResult};

/// Shared handle to the SQLite database.
///
/// Every engine operation acquires exactly one transaction from this pool
/// and commits or rolls back as a unit; repository functions never open
/// transactions of their own.
pub struct DatabaseService {
    pool: SqlitePool,
}

impl DatabaseService {
    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the schema if it does not exist yet.
    pub async fn init(&self) -> AppResult<()> {
        schema::init_schema(&self.pool).await
    }

    /// Check database health with a simple query.
    pub async fn health_check(&self) -> AppResult<bool> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| true)
            .map_err(AppError::Database)
    }
}

/// Create a new database pool from a connection URL.
///
/// Foreign keys are enforced on every connection; the database file is
/// created on first use.
pub async fn create_pool(database_url: &str, max_connections: u32) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(AppError::Database)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(AppError::Database)
}
