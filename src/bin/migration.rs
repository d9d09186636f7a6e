//! Applies the embedded schema migrations to the configured database.
//!
//! Configuration comes from `config/` files and `APP__`-prefixed
//! environment variables, e.g. `APP__DATABASE_URL=postgres://...`.

use edu_asset_core::{config, db};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = config::load_config()?;
    let pool = db::establish_connection_from_app_config(&cfg).await?;

    db::run_migrations(&pool).await?;
    db::close_pool(pool).await?;

    Ok(())
}
