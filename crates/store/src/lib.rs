//! `obraplan-store` — document store contract and in-memory implementation.
//!
//! The rest of the workspace talks to persistence exclusively through the
//! [`EntityStore`] trait: schema-less documents grouped into named
//! collections, with conditional writes for optimistic concurrency and a
//! change feed that re-pushes the full result set of a scope on every
//! mutation touching it.

pub mod change_feed;
pub mod document;
pub mod entity_store;
pub mod in_memory;
pub mod query;

pub use change_feed::{ChangeSet, Scope, Subscription};
pub use document::{Document, DocumentRef};
pub use entity_store::{EntityStore, StoreError};
pub use in_memory::InMemoryStore;
pub use query::{Filter, OrderBy};
