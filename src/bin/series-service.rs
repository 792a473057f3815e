use anyhow::Result;
use tracing_subscriber::prelude::*;

use series_service::datasource::repository::PgSeriesStore;
use series_service::state::{self, AppState, DbConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_config = DbConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    let pool = state::create_db_pool(&db_config).await?;
    sqlx::migrate!().run(&pool).await?;

    let app_state = AppState::new(PgSeriesStore::new(pool));
    series_service::serve_axum(app_state, server_config.port).await?;
    Ok(())
}
