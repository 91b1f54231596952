//! In-memory document store.
//!
//! Intended for tests/dev and as the reference implementation of the
//! [`EntityStore`] contract. Not optimized for performance.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::change_feed::{ChangeHub, ChangeSet, Scope, Subscription};
use crate::document::{Document, DocumentRef};
use crate::entity_store::{EntityStore, StoreError};
use crate::query::{Filter, OrderBy};

type Collections = HashMap<&'static str, HashMap<Uuid, Document>>;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
    hub: ChangeHub,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(map: &Collections, collection: &'static str) -> Vec<Document> {
        map.get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl EntityStore for InMemoryStore {
    fn get(&self, collection: &'static str, id: Uuid) -> Result<Document, StoreError> {
        let map = self
            .collections
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        map.get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn put(
        &self,
        collection: &'static str,
        id: Option<Uuid>,
        fields: JsonValue,
    ) -> Result<Uuid, StoreError> {
        if !fields.is_object() {
            return Err(StoreError::Serialization(
                "document fields must be a JSON object".to_string(),
            ));
        }

        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let docs = map.entry(collection).or_default();
        let id = id.unwrap_or_else(Uuid::now_v7);
        let version = docs.get(&id).map(|d| d.version + 1).unwrap_or(1);
        docs.insert(
            id,
            Document {
                id,
                version,
                fields,
            },
        );

        // Publish under the write lock so pushes observe writes in order.
        let snapshot = Self::snapshot(&map, collection);
        self.hub.publish(collection, &snapshot);

        Ok(id)
    }

    fn update_if(
        &self,
        collection: &'static str,
        id: Uuid,
        expected_version: u64,
        fields: JsonValue,
    ) -> Result<(), StoreError> {
        if !fields.is_object() {
            return Err(StoreError::Serialization(
                "document fields must be a JSON object".to_string(),
            ));
        }

        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let doc = map
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&id))
            .ok_or(StoreError::NotFound)?;

        if doc.version != expected_version {
            return Err(StoreError::Conflict(format!(
                "expected version {expected_version}, found {}",
                doc.version
            )));
        }

        doc.version += 1;
        doc.fields = fields;

        let snapshot = Self::snapshot(&map, collection);
        self.hub.publish(collection, &snapshot);

        Ok(())
    }

    fn delete(&self, collection: &'static str, id: Uuid) -> Result<(), StoreError> {
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let removed = map
            .get_mut(collection)
            .and_then(|docs| docs.remove(&id))
            .is_some();

        if removed {
            let snapshot = Self::snapshot(&map, collection);
            self.hub.publish(collection, &snapshot);
        }

        Ok(())
    }

    fn query(
        &self,
        collection: &'static str,
        filter: Option<&Filter>,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        let map = self
            .collections
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let mut docs: Vec<Document> = Self::snapshot(&map, collection)
            .into_iter()
            .filter(|d| filter.map(|f| f.matches(d)).unwrap_or(true))
            .collect();

        if let Some(order) = order_by {
            order.sort(&mut docs);
        }

        Ok(docs)
    }

    fn batch_delete(&self, refs: &[DocumentRef]) -> Result<(), StoreError> {
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let mut touched: Vec<&'static str> = Vec::new();
        for r in refs {
            let removed = map
                .get_mut(r.collection)
                .and_then(|docs| docs.remove(&r.id))
                .is_some();
            if removed && !touched.contains(&r.collection) {
                touched.push(r.collection);
            }
        }

        // One push per touched collection, after the whole batch landed.
        for collection in touched {
            let snapshot = Self::snapshot(&map, collection);
            self.hub.publish(collection, &snapshot);
        }

        Ok(())
    }

    fn subscribe(&self, scope: Scope) -> Subscription<ChangeSet> {
        let initial = match self.collections.read() {
            Ok(map) => Self::snapshot(&map, scope.collection())
                .into_iter()
                .filter(|d| scope.contains(d))
                .collect(),
            Err(_) => Vec::new(),
        };

        self.hub.subscribe_with(scope, initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn put_assigns_version_one_then_bumps() {
        let store = InMemoryStore::new();
        let id = store.put("materials", None, json!({"name": "Arena"})).unwrap();
        assert_eq!(store.get("materials", id).unwrap().version, 1);

        store
            .put("materials", Some(id), json!({"name": "Arena fina"}))
            .unwrap();
        let doc = store.get("materials", id).unwrap();
        assert_eq!(doc.version, 2);
        assert_eq!(doc.fields["name"], json!("Arena fina"));
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryStore::new();
        assert_eq!(
            store.get("materials", Uuid::now_v7()),
            Err(StoreError::NotFound)
        );
    }

    #[test]
    fn update_if_rejects_stale_version() {
        let store = InMemoryStore::new();
        let id = store.put("materials", None, json!({"stock": 10.0})).unwrap();

        store
            .update_if("materials", id, 1, json!({"stock": 8.0}))
            .unwrap();

        // Version moved to 2; a writer still holding version 1 must lose.
        let err = store
            .update_if("materials", id, 1, json!({"stock": 6.0}))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.get("materials", id).unwrap().fields["stock"], json!(8.0));
    }

    #[test]
    fn delete_is_idempotent() {
        let store = InMemoryStore::new();
        let id = store.put("budgets", None, json!({"name": "Obra"})).unwrap();
        store.delete("budgets", id).unwrap();
        store.delete("budgets", id).unwrap();
        assert_eq!(store.get("budgets", id), Err(StoreError::NotFound));
    }

    #[test]
    fn query_filters_and_orders() {
        let store = InMemoryStore::new();
        let parent = Uuid::now_v7();
        for (n, q) in [("a", 2.0), ("b", 1.0)] {
            store
                .put(
                    "lines",
                    None,
                    json!({"budget_id": parent.to_string(), "name": n, "quantity": q}),
                )
                .unwrap();
        }
        store
            .put("lines", None, json!({"budget_id": "other", "name": "c"}))
            .unwrap();

        let filter = Filter::field_equals("budget_id", parent.to_string());
        let docs = store
            .query("lines", Some(&filter), Some(&OrderBy::asc("quantity")))
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].fields["name"], json!("b"));
    }

    #[test]
    fn subscribe_pushes_initial_and_per_mutation_snapshots() {
        let store = InMemoryStore::new();
        store.put("materials", None, json!({"name": "Arena"})).unwrap();

        let sub = store.subscribe(Scope::Collection("materials"));
        assert_eq!(sub.try_recv().unwrap().documents.len(), 1);

        store.put("materials", None, json!({"name": "Cemento"})).unwrap();
        assert_eq!(sub.try_recv().unwrap().documents.len(), 2);
    }

    #[test]
    fn batch_delete_pushes_once_per_collection() {
        let store = InMemoryStore::new();
        let a = store.put("lines", None, json!({"n": 1})).unwrap();
        let b = store.put("lines", None, json!({"n": 2})).unwrap();

        let sub = store.subscribe(Scope::Collection("lines"));
        let _ = sub.try_recv();

        store
            .batch_delete(&[
                DocumentRef::new("lines", a),
                DocumentRef::new("lines", b),
                DocumentRef::new("lines", Uuid::now_v7()),
            ])
            .unwrap();

        let change = sub.try_recv().unwrap();
        assert!(change.documents.is_empty());
        assert!(sub.try_recv().is_err());
    }
}
