use serde_json::{Map, Value};

use crate::store::Document;

/// Store-managed fields. Client payloads may never set these; the wire
/// format spells them out explicitly.
pub const SYSTEM_FIELDS: &[&str] = &["id", "owner", "created_at", "updated_at"];

/// Flatten a stored document into the public wire format:
/// `{ id, title, text, category?, owner, created_at, updated_at }`.
pub fn to_wire(doc: &Document) -> Value {
    let mut obj = Map::new();
    obj.insert("id".into(), Value::String(doc.id.to_string()));
    for (k, v) in &doc.fields {
        if SYSTEM_FIELDS.contains(&k.as_str()) {
            continue;
        }
        obj.insert(k.clone(), v.clone());
    }
    obj.insert("owner".into(), Value::String(doc.owner.to_string()));
    obj.insert(
        "created_at".into(),
        Value::String(doc.created_at.to_rfc3339()),
    );
    obj.insert(
        "updated_at".into(),
        Value::String(doc.updated_at.to_rfc3339()),
    );
    Value::Object(obj)
}

pub fn to_wire_array(docs: &[Document]) -> Value {
    Value::Array(docs.iter().map(to_wire).collect())
}

/// Drop store-managed keys from a client payload. The owner set at
/// creation is immutable, and ids/timestamps are store-assigned.
pub fn strip_system_fields(mut payload: Map<String, Value>) -> Map<String, Value> {
    for field in SYSTEM_FIELDS {
        payload.remove(*field);
    }
    payload
}
