use anyhow::Result;
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::migrate::Migrator;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storefront::{AppState, config::AppConfig, create_router};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting storefront service");

    let config = AppConfig::load()?;

    // The pool is lazy; an unreachable database only disables writes
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config)?;

    let database_reachable = match health_check(&pool).await {
        Ok(_) => {
            info!("Database connection successful");
            true
        }
        Err(e) if e.is_connection() => {
            warn!("Database unreachable, serving fallback data: {}", e);
            false
        }
        Err(e) => {
            warn!("Database health check failed, serving fallback data: {}", e);
            false
        }
    };

    if database_reachable && config.server.run_migrations {
        run_migrations(&pool, &MIGRATOR).await?;
    }

    let bind_address = config.server.bind_address();
    let state = AppState::new(pool, config)?;
    state.image_pipeline.ensure_dirs().await?;

    if database_reachable {
        if let Err(e) = state.seed_bootstrap_admin().await {
            warn!("Failed to seed bootstrap admin: {}", e);
        }
    }

    let app = create_router(state);

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Storefront service listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
