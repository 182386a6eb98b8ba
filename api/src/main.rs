use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;

use employee_api::config::{Config, StoreBackend};
use employee_api::observability::Observability;
use employee_api::routes;
use employee_api::state::AppState;
use employee_api::store::{EmployeeStore, MemoryEmployeeStore, PgEmployeeStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = Config::from_env()?;
    let obs = Observability::init(config.log_format)?;

    let store: Arc<dyn EmployeeStore> = match config.store {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(config.database_url()?)
                .await?;

            sqlx::migrate!("../migrations").run(&pool).await?;
            tracing::info!("Database connected and migrations applied");

            Arc::new(PgEmployeeStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("EMPLOYEE_STORE=memory, records are lost on shutdown");
            Arc::new(MemoryEmployeeStore::new())
        }
    };

    let state = AppState::new(store, obs.registry);
    let app = routes::build_router(state).layer(routes::cors_layer(&config.cors_allowed_origins)?);

    let addr = config.bind_addr();
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
