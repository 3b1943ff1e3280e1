pub mod guards;
pub mod handlers;
pub mod model;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::store::DocumentStore;

/// Descriptor for one owned-resource surface: the route prefix and the
/// JSON envelope keys. Both resources share the same schema and flows,
/// so this is the only per-resource variation.
#[derive(Clone, Copy, Debug)]
pub struct Resource {
    pub plural: &'static str,
    pub singular: &'static str,
}

pub const TRAINEES: Resource = Resource {
    plural: "trainees",
    singular: "trainee",
};

pub const PROGRAMS: Resource = Resource {
    plural: "programs",
    singular: "program",
};

/// Per-resource handler state: the descriptor plus the injected store handle.
#[derive(Clone)]
pub struct ResourceState {
    pub resource: Resource,
    pub store: Arc<dyn DocumentStore>,
}

/// Mount the five CRUD routes for one resource.
pub fn router(resource: Resource, store: Arc<dyn DocumentStore>) -> Router {
    let collection_path = format!("/{}", resource.plural);
    let record_path = format!("/{}/:id", resource.plural);

    Router::new()
        .route(
            &collection_path,
            get(handlers::index).post(handlers::create),
        )
        .route(
            &record_path,
            get(handlers::show)
                .patch(handlers::update)
                .delete(handlers::destroy),
        )
        .with_state(ResourceState { resource, store })
}
