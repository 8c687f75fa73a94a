use rusty_library_access::{
    adapters::postgres::{self, PostgresLibraryStore},
    api::{handlers::AppState, router::create_router},
    application::ServiceDependencies,
    config::ServerConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_library_access=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    tracing::info!(
        "Database: {}@{}:{}/{}",
        config.username,
        config.database.host,
        config.database.port,
        config.database_name
    );

    // Initialize database connection pool
    let pool = postgres::connect(
        &config.database,
        &config.database_name,
        &config.username,
        &config.password,
    )
    .await
    .expect("Failed to connect to database");

    // Initialize adapters
    let store = Arc::new(PostgresLibraryStore::new(pool));

    // Create application state
    let app_state = Arc::new(AppState {
        service_deps: ServiceDependencies::new(store),
    });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
