//! Change feed: per-scope pub/sub over store mutations.
//!
//! Display layers subscribe to a [`Scope`] and receive the **full current
//! result set** of that scope every time a mutation touches it. The feed
//! is distribution only; the store itself stays the source of truth, so
//! a missed or duplicated push costs nothing beyond a redundant repaint.

use serde_json::Value as JsonValue;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::document::Document;

/// What a subscriber watches.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// Every document in a collection.
    Collection(&'static str),
    /// Documents in `collection` whose `parent_field` equals `parent_id`
    /// (subcollection scoped to a parent document).
    Children {
        collection: &'static str,
        parent_field: &'static str,
        parent_id: Uuid,
    },
}

impl Scope {
    pub fn collection(&self) -> &'static str {
        match self {
            Scope::Collection(c) => c,
            Scope::Children { collection, .. } => collection,
        }
    }

    /// Whether a document belongs to this scope's result set.
    pub fn contains(&self, doc: &Document) -> bool {
        match self {
            Scope::Collection(_) => true,
            Scope::Children {
                parent_field,
                parent_id,
                ..
            } => {
                doc.fields.get(*parent_field)
                    == Some(&JsonValue::String(parent_id.to_string()))
            }
        }
    }
}

/// One push from the change feed: the scope's current result set.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    pub scope: Scope,
    pub documents: Vec<Document>,
}

/// A live subscription to a scope.
///
/// Dropping the subscription is the unsubscribe: the hub prunes
/// disconnected receivers on its next publish.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Fan-out hub the in-memory store publishes through.
///
/// Best-effort delivery; subscribers must treat pushes as idempotent
/// snapshots (they are full result sets, not deltas).
#[derive(Debug, Default)]
pub struct ChangeHub {
    subscribers: Mutex<Vec<(Scope, Sender<ChangeSet>)>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for `scope`.
    pub fn subscribe(&self, scope: Scope) -> Subscription<ChangeSet> {
        let (tx, rx) = channel();

        // If the lock is poisoned the subscription is still returned; it
        // just never receives pushes.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push((scope, tx));
        }

        Subscription::new(rx)
    }

    /// Register a subscriber and seed it with the scope's current result
    /// set, so a display layer renders without waiting for a mutation.
    pub fn subscribe_with(
        &self,
        scope: Scope,
        initial: Vec<Document>,
    ) -> Subscription<ChangeSet> {
        let (tx, rx) = channel();

        let _ = tx.send(ChangeSet {
            scope: scope.clone(),
            documents: initial,
        });

        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push((scope, tx));
        }

        Subscription::new(rx)
    }

    /// Push result sets to every subscriber watching `collection`.
    ///
    /// `snapshot` must be the collection's current documents; each
    /// subscriber gets them narrowed to its own scope. Dead subscribers
    /// are dropped while publishing.
    pub fn publish(&self, collection: &'static str, snapshot: &[Document]) {
        let Ok(mut subs) = self.subscribers.lock() else {
            return;
        };

        subs.retain(|(scope, tx)| {
            if scope.collection() != collection {
                return true;
            }
            let documents: Vec<Document> = snapshot
                .iter()
                .filter(|d| scope.contains(d))
                .cloned()
                .collect();
            tx.send(ChangeSet {
                scope: scope.clone(),
                documents,
            })
            .is_ok()
        });
    }
}
