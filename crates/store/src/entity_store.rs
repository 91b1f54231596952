//! The entity store contract consumed by the domain crates.

use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::change_feed::{ChangeSet, Scope, Subscription};
use crate::document::{Document, DocumentRef};
use crate::query::{Filter, OrderBy};

/// Store operation error.
///
/// Infrastructure failures only; domain rules live above this layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No document under the given collection/id.
    #[error("document not found")]
    NotFound,

    /// Conditional write rejected: the stored version moved.
    #[error("version conflict: {0}")]
    Conflict(String),

    /// The store cannot serve requests (lock poisoned, backend down).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Document fields failed to encode/decode.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<StoreError> for obraplan_core::DomainError {
    fn from(value: StoreError) -> Self {
        use obraplan_core::DomainError;
        match value {
            StoreError::NotFound => DomainError::NotFound,
            StoreError::Conflict(msg) => DomainError::Conflict(msg),
            StoreError::Unavailable(msg) => DomainError::StoreUnavailable(msg),
            StoreError::Serialization(msg) => DomainError::StoreUnavailable(msg),
        }
    }
}

/// Key-value document store with query, subscription, and batch-write
/// capabilities.
///
/// The contract is deliberately small:
///
/// - Documents are versioned; every write bumps the version.
/// - `update_if` is the conditional read-modify-write primitive: callers
///   read a document, decide against its fields, and commit only if the
///   version they read is still current. The inventory ledger builds its
///   reserve/release atomicity on this.
/// - `query` returns a finite snapshot; it does not observe later writes.
/// - `subscribe` pushes the full current result set of a scope on every
///   mutation touching that scope's collection. Dropping the returned
///   [`Subscription`] unsubscribes.
///
/// Implementations must be usable behind `Arc` from multiple threads.
pub trait EntityStore: Send + Sync {
    /// Fetch one document.
    fn get(&self, collection: &'static str, id: Uuid) -> Result<Document, StoreError>;

    /// Create (fresh id when `id` is `None`) or upsert a document.
    ///
    /// Returns the document id. `fields` must be a JSON object.
    fn put(
        &self,
        collection: &'static str,
        id: Option<Uuid>,
        fields: JsonValue,
    ) -> Result<Uuid, StoreError>;

    /// Replace `fields` only if the stored version equals `expected_version`.
    fn update_if(
        &self,
        collection: &'static str,
        id: Uuid,
        expected_version: u64,
        fields: JsonValue,
    ) -> Result<(), StoreError>;

    /// Delete one document. Deleting a missing document is a no-op.
    fn delete(&self, collection: &'static str, id: Uuid) -> Result<(), StoreError>;

    /// Snapshot query over one collection.
    fn query(
        &self,
        collection: &'static str,
        filter: Option<&Filter>,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Delete a batch of documents as one mutation (cascade path).
    ///
    /// Missing refs are skipped; each touched collection publishes a
    /// single change push.
    fn batch_delete(&self, refs: &[DocumentRef]) -> Result<(), StoreError>;

    /// Watch a scope. The current result set is pushed immediately, then
    /// again after every mutation touching the scope's collection.
    fn subscribe(&self, scope: Scope) -> Subscription<ChangeSet>;
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    fn get(&self, collection: &'static str, id: Uuid) -> Result<Document, StoreError> {
        (**self).get(collection, id)
    }

    fn put(
        &self,
        collection: &'static str,
        id: Option<Uuid>,
        fields: JsonValue,
    ) -> Result<Uuid, StoreError> {
        (**self).put(collection, id, fields)
    }

    fn update_if(
        &self,
        collection: &'static str,
        id: Uuid,
        expected_version: u64,
        fields: JsonValue,
    ) -> Result<(), StoreError> {
        (**self).update_if(collection, id, expected_version, fields)
    }

    fn delete(&self, collection: &'static str, id: Uuid) -> Result<(), StoreError> {
        (**self).delete(collection, id)
    }

    fn query(
        &self,
        collection: &'static str,
        filter: Option<&Filter>,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).query(collection, filter, order_by)
    }

    fn batch_delete(&self, refs: &[DocumentRef]) -> Result<(), StoreError> {
        (**self).batch_delete(refs)
    }

    fn subscribe(&self, scope: Scope) -> Subscription<ChangeSet> {
        (**self).subscribe(scope)
    }
}
