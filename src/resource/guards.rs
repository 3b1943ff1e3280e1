use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::store::Document;

/// 404 when a by-id lookup came back empty. Applied immediately after
/// every lookup.
pub fn ensure_found(lookup: Option<Document>) -> Result<Document, ApiError> {
    lookup.ok_or_else(|| ApiError::not_found("Record not found"))
}

/// 401 when the requester does not own the record. Runs before every
/// mutating store call; reads are deliberately unguarded.
pub fn check_ownership(user: &AuthUser, document: &Document) -> Result<(), ApiError> {
    if document.owner != user.user_id {
        return Err(ApiError::unauthorized("You do not own this record"));
    }
    Ok(())
}

/// Recursively remove empty-string entries from a payload so a partial
/// update never erases a stored value,
/// e.g. `{ "title": "", "text": "foo" }` -> `{ "text": "foo" }`.
pub fn strip_blanks(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !matches!(v, Value::String(s) if s.is_empty()))
                .map(|(k, v)| (k, strip_blanks(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_blanks).collect()),
        other => other,
    }
}

/// 422 when a create payload is missing `title` or `text`.
pub fn validate_create(attributes: &Map<String, Value>) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();
    for field in ["title", "text"] {
        match attributes.get(field) {
            Some(Value::String(s)) if !s.is_empty() => {}
            _ => {
                field_errors.insert(field.to_string(), "is required".to_string());
            }
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity(
            "Missing required fields",
            field_errors,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn document_owned_by(owner: Uuid) -> Document {
        Document {
            id: Uuid::new_v4(),
            owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            fields: Map::new(),
        }
    }

    fn user(user_id: Uuid) -> AuthUser {
        AuthUser {
            user_id,
            email: "caleb@example.com".to_string(),
        }
    }

    #[test]
    fn ensure_found_passes_records_through() {
        let doc = document_owned_by(Uuid::new_v4());
        let id = doc.id;
        assert_eq!(ensure_found(Some(doc)).unwrap().id, id);
    }

    #[test]
    fn ensure_found_maps_none_to_404() {
        let err = ensure_found(None).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn owner_passes_ownership_check() {
        let owner = Uuid::new_v4();
        let doc = document_owned_by(owner);
        assert!(check_ownership(&user(owner), &doc).is_ok());
    }

    #[test]
    fn non_owner_gets_401() {
        let doc = document_owned_by(Uuid::new_v4());
        let err = check_ownership(&user(Uuid::new_v4()), &doc).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn strip_blanks_removes_empty_strings_recursively() {
        let payload = json!({
            "trainee": {
                "title": "",
                "text": "foo",
                "tags": [{ "label": "", "kind": "x" }]
            }
        });

        let stripped = strip_blanks(payload);
        assert!(stripped["trainee"].get("title").is_none());
        assert_eq!(stripped["trainee"]["text"], json!("foo"));
        assert!(stripped["trainee"]["tags"][0].get("label").is_none());
        assert_eq!(stripped["trainee"]["tags"][0]["kind"], json!("x"));
    }

    #[test]
    fn strip_blanks_keeps_non_string_values() {
        let payload = json!({ "count": 0, "flag": false, "note": null });
        let stripped = strip_blanks(payload);
        assert_eq!(stripped["count"], json!(0));
        assert_eq!(stripped["flag"], json!(false));
        assert_eq!(stripped["note"], json!(null));
    }

    #[test]
    fn validate_create_requires_title_and_text() {
        let mut attrs = Map::new();
        attrs.insert("title".into(), json!("T"));
        let err = validate_create(&attrs).unwrap_err();
        assert_eq!(err.status_code(), 422);

        attrs.insert("text".into(), json!("X"));
        assert!(validate_create(&attrs).is_ok());
    }

    #[test]
    fn validate_create_rejects_empty_strings() {
        let mut attrs = Map::new();
        attrs.insert("title".into(), json!(""));
        attrs.insert("text".into(), json!("X"));
        let err = validate_create(&attrs).unwrap_err();
        assert_eq!(err.status_code(), 422);
    }
}
