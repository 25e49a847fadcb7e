pub mod in_memory;
pub mod paths;

use crate::core::errors::LedgerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tokio::sync::broadcast;

/// Location of one document: `collection/id`. Collections may themselves be
/// nested, e.g. `groups/g1/expenses`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentPath {
    pub collection: String,
    pub id: String,
}

impl DocumentPath {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        DocumentPath {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Pushed to subscribers of a collection after every write to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub path: DocumentPath,
    pub kind: ChangeKind,
    pub document: Option<Value>,
}

/// Remote document store the ledger is persisted in: per-document CRUD,
/// field-level updates and live change subscriptions per collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Value>, LedgerError>;
    /// Upsert.
    async fn set(&self, path: &DocumentPath, document: Value) -> Result<(), LedgerError>;
    /// Merges `fields` into an existing object document.
    async fn update_fields(&self, path: &DocumentPath, fields: Map<String, Value>) -> Result<(), LedgerError>;
    async fn delete(&self, path: &DocumentPath) -> Result<bool, LedgerError>;
    /// Every document of `collection` as `(id, document)`, ordered by id.
    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, LedgerError>;
    async fn subscribe(&self, collection: &str) -> Result<broadcast::Receiver<ChangeEvent>, LedgerError>;
}
