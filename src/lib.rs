pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod resource;
pub mod store;

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use store::DocumentStore;

/// Top-level state for the public routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

/// Build the full router around an injected store handle. Integration
/// tests call this directly instead of binding a socket.
pub fn app(store: Arc<dyn DocumentStore>) -> Router {
    // Both resource surfaces sit behind the bearer middleware; auth
    // failures return 401 before any handler logic runs.
    let resources = Router::new()
        .merge(resource::router(resource::TRAINEES, store.clone()))
        .merge(resource::router(resource::PROGRAMS, store.clone()))
        .layer(axum::middleware::from_fn(
            middleware::bearer_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(AppState { store })
        .merge(resources)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Roster API",
        "version": version,
        "description": "Authenticated CRUD API for owned trainee and program records",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "trainees": "/trainees[/:id] (bearer token required)",
            "programs": "/programs[/:id] (bearer token required)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "store_error": e.to_string()
            })),
        ),
    }
}
