//! `db` maintenance command handlers.

use revdb_core::AppConfig;

pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = revdb_db::PoolConfig::from_app_config(config);
    let pool = revdb_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

pub(crate) async fn run_db_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    revdb_db::health_check(&pool).await?;
    println!("database reachable");
    pool.close().await;
    Ok(())
}

pub(crate) async fn run_db_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let applied = revdb_db::run_migrations(&pool).await?;
    println!("migrations complete: {applied} applied");
    pool.close().await;
    Ok(())
}

/// Delete every stored review. Refuses to run without `--yes`.
///
/// # Errors
///
/// Returns an error if `yes` is false or the database cannot be reached.
pub(crate) async fn run_db_reset(config: &AppConfig, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("refusing to delete all reviews without --yes");
    }

    let pool = connect(config).await?;
    let deleted = revdb_db::delete_all_reviews(&pool).await?;
    tracing::warn!(deleted, env = %config.env, "review table reset");
    println!("reset complete: {deleted} reviews deleted");
    pool.close().await;
    Ok(())
}
