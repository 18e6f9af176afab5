//! One-shot bootstrap: create the schema, seed the workflow catalog, and
//! install the first-run accounts.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use approval_core::infrastructure::database::{create_pool, seed, DatabaseService};
use approval_core::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone())),
        )
        .init();

    info!(url = %settings.database.url, "initializing database");
    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    let db = DatabaseService::new(pool);
    db.init().await?;

    let mut tx = db.pool().begin().await?;
    seed::ensure_workflow_catalog(&mut tx).await?;
    seed::reconcile_workflow_catalog(&mut tx).await?;
    seed::ensure_default_accounts(&mut tx).await?;
    tx.commit().await?;

    info!("setup complete");
    Ok(())
}
