use std::sync::Arc;

use roster_api::store::{DocumentStore, MemoryStore, PostgresStore};
use roster_api::{app, config};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ROSTER_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Roster API in {:?} mode", config.environment);

    let store: Arc<dyn DocumentStore> = match &config.database.url {
        Some(url) => {
            let pg = PostgresStore::connect(
                url,
                config.database.max_connections,
                config.database.connection_timeout,
            )
            .await
            .unwrap_or_else(|e| panic!("failed to connect to store: {}", e));
            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let app = app(store);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Roster API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
