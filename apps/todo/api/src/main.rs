use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_tasks::{InMemoryTaskRepository, Pages, PgTaskRepository};
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use api::TaskRoutes;
use config::Config;
use openapi::ApiDoc;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let pages = Pages::new().map_err(|e| eyre::eyre!("Failed to load page templates: {}", e))?;

    let db = match config.database.clone() {
        Some(database) => {
            let db = database::postgres::connect_from_config_with_retry(
                database,
                Some(config.retry.clone()),
            )
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

            if config.bootstrap_schema {
                domain_tasks::postgres::ensure_schema(&db)
                    .await
                    .map_err(|e| eyre::eyre!("Schema bootstrap failed: {}", e))?;
            }

            info!("Using PostgreSQL task store");
            Some(db)
        }
        None => {
            warn!("DATABASE_URL not set, tasks are kept in memory and lost on restart");
            None
        }
    };

    let routes = match &db {
        Some(db) => TaskRoutes::new(PgTaskRepository::new(db.clone()), pages),
        None => TaskRoutes::new(InMemoryTaskRepository::new(), pages),
    };

    let state = AppState { db: db.clone() };

    let router = create_router::<ApiDoc>(routes.apis, routes.pages, &config.server)?
        .merge(health_router(config.app.clone()))
        .merge(api::ready_router(state));

    info!(
        name = config.app.name,
        version = config.app.version,
        "Starting server on {}",
        config.server.address()
    );

    let cleanup = async move {
        if let Some(db) = db {
            database::postgres::close(db).await;
        }
    };

    create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;

    info!("Server shutdown complete");
    Ok(())
}
