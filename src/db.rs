use std::path::Path;

use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::AppConfig;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Apply every pending SQL migration found in `dir`, in version order.
pub async fn run_migrations(db: &PgPool, dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let dir = dir.as_ref();
    let migrator = Migrator::new(dir.to_path_buf())
        .await
        .with_context(|| format!("load migrations from {}", dir.display()))?;
    migrator.run(db).await.context("run migrations")?;
    info!(dir = %dir.display(), count = migrator.iter().count(), "migrations applied");
    Ok(())
}
