use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use catalog::{
    AppState,
    config::AppConfig,
    jwt::JwtService,
    repositories::{self, PgProductRepository},
    routes,
};
use common::database::{health_check, init_pool};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting catalog service");

    let config = AppConfig::from_env()?;

    // Initialize database connection pool
    let pool = init_pool(&config.database()).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    if config.database_run_migrations {
        repositories::run_migrations(&pool).await?;
    }

    let app_state = AppState::new(
        Arc::new(PgProductRepository::new(pool)),
        JwtService::new(&config.jwt_secret),
    );

    // Start the web server
    let app = routes::create_router(app_state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Catalog service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
