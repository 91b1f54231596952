//! Document shapes stored and returned by the entity store.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entity_store::StoreError;

/// A versioned, schema-less document.
///
/// `version` starts at 1 on create and bumps on every write; it is the
/// token conditional writes ([`EntityStore::update_if`]) check against.
///
/// `fields` is always a JSON object. The document id is also kept inside
/// `fields` by the domain entities that serialize into it, so a decoded
/// entity is self-contained.
///
/// [`EntityStore::update_if`]: crate::EntityStore::update_if
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub version: u64,
    pub fields: JsonValue,
}

impl Document {
    /// Decode the document fields into a typed entity.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.fields.clone())
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Reference to a document, used for batch deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    pub collection: &'static str,
    pub id: Uuid,
}

impl DocumentRef {
    pub fn new(collection: &'static str, id: Uuid) -> Self {
        Self { collection, id }
    }
}

/// Serialize a typed entity into document fields.
///
/// Fails unless the entity serializes to a JSON object.
pub fn to_fields<T: Serialize>(entity: &T) -> Result<JsonValue, StoreError> {
    let value =
        serde_json::to_value(entity).map_err(|e| StoreError::Serialization(e.to_string()))?;
    if !value.is_object() {
        return Err(StoreError::Serialization(
            "document fields must be a JSON object".to_string(),
        ));
    }
    Ok(value)
}
