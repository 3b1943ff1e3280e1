use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::guards::{check_ownership, ensure_found, strip_blanks, validate_create};
use super::model::{strip_system_fields, to_wire, to_wire_array};
use super::ResourceState;

/// Wrap a value under the resource's envelope key.
fn wrap(key: &str, value: Value) -> Value {
    let mut obj = Map::new();
    obj.insert(key.to_string(), value);
    Value::Object(obj)
}

/// Unwrap a JSON body, turning an unreadable one into the 400 envelope.
fn require_json(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;
    Ok(payload)
}

/// Pull the `{ "<singular>": { ... } }` envelope out of a request body.
fn envelope(mut payload: Value, singular: &str) -> Result<Map<String, Value>, ApiError> {
    match payload.get_mut(singular).map(Value::take) {
        Some(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::bad_request(format!(
            "expected request body under '{}'",
            singular
        ))),
    }
}

/// GET /{resource} - List all records.
///
/// Reads require authentication but are not filtered by owner; any
/// authenticated user sees every record.
pub async fn index(
    State(state): State<ResourceState>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let documents = state.store.list(state.resource.plural).await?;

    let body = wrap(state.resource.plural, to_wire_array(&documents));
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// GET /{resource}/:id - Get a single record by id
pub async fn show(
    State(state): State<ResourceState>,
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let document = ensure_found(state.store.find(state.resource.plural, id).await?)?;

    let body = wrap(state.resource.singular, to_wire(&document));
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// POST /{resource} - Create a record owned by the requester
pub async fn create(
    State(state): State<ResourceState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let payload = require_json(payload)?;
    let attributes = envelope(payload, state.resource.singular)?;
    validate_create(&attributes)?;

    // The requester becomes the owner; store-managed keys can't be smuggled in
    let fields = strip_system_fields(attributes);
    let document = state
        .store
        .insert(state.resource.plural, user.user_id, fields)
        .await?;

    let body = wrap(state.resource.singular, to_wire(&document));
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// PATCH /{resource}/:id - Partial-merge update, owner only
pub async fn update(
    State(state): State<ResourceState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    // Blank strings are dropped first so they never overwrite stored values
    let payload = strip_blanks(require_json(payload)?);
    let changes = envelope(payload, state.resource.singular)?;
    // A client-supplied owner (or id/timestamps) never reaches the store
    let changes = strip_system_fields(changes);

    let document = ensure_found(state.store.find(state.resource.plural, id).await?)?;
    check_ownership(&user, &document)?;

    if !state.store.update(state.resource.plural, id, changes).await? {
        // Removed between the lookup and the merge
        return Err(ApiError::not_found("Record not found"));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// DELETE /{resource}/:id - Remove a record, owner only
pub async fn destroy(
    State(state): State<ResourceState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let document = ensure_found(state.store.find(state.resource.plural, id).await?)?;
    check_ownership(&user, &document)?;

    if !state.store.remove(state.resource.plural, id).await? {
        return Err(ApiError::not_found("Record not found"));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}
