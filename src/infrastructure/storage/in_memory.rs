use super::{ChangeEvent, ChangeKind, DocumentPath, DocumentStore};
use crate::core::errors::LedgerError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

const SUBSCRIPTION_CAPACITY: usize = 64;

#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, BTreeMap<String, Value>>>>,
    subscribers: Arc<RwLock<HashMap<String, broadcast::Sender<ChangeEvent>>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        InMemoryDocumentStore {
            collections: Arc::new(RwLock::new(HashMap::new())),
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn notify(&self, path: &DocumentPath, kind: ChangeKind, document: Option<Value>) {
        let subscribers = self.subscribers.read().await;
        if let Some(sender) = subscribers.get(&path.collection) {
            // No live receivers is not an error.
            let _ = sender.send(ChangeEvent {
                path: path.clone(),
                kind,
                document,
            });
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Value>, LedgerError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&path.collection)
            .and_then(|docs| docs.get(&path.id))
            .cloned())
    }

    async fn set(&self, path: &DocumentPath, document: Value) -> Result<(), LedgerError> {
        let previous = {
            let mut collections = self.collections.write().await;
            collections
                .entry(path.collection.clone())
                .or_default()
                .insert(path.id.clone(), document.clone())
        };
        let kind = if previous.is_some() {
            ChangeKind::Updated
        } else {
            ChangeKind::Created
        };
        self.notify(path, kind, Some(document)).await;
        Ok(())
    }

    async fn update_fields(&self, path: &DocumentPath, fields: Map<String, Value>) -> Result<(), LedgerError> {
        let updated = {
            let mut collections = self.collections.write().await;
            let document = collections
                .get_mut(&path.collection)
                .and_then(|docs| docs.get_mut(&path.id))
                .ok_or_else(|| LedgerError::StorageError(format!("Document {} not found", path)))?;
            let object = document
                .as_object_mut()
                .ok_or_else(|| LedgerError::StorageError(format!("Document {} is not an object", path)))?;
            for (key, value) in fields {
                object.insert(key, value);
            }
            document.clone()
        };
        self.notify(path, ChangeKind::Updated, Some(updated)).await;
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> Result<bool, LedgerError> {
        let removed = {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(&path.collection)
                .and_then(|docs| docs.remove(&path.id))
                .is_some()
        };
        if removed {
            self.notify(path, ChangeKind::Deleted, None).await;
        }
        Ok(removed)
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, LedgerError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().map(|(id, doc)| (id.clone(), doc.clone())).collect())
            .unwrap_or_default())
    }

    async fn subscribe(&self, collection: &str) -> Result<broadcast::Receiver<ChangeEvent>, LedgerError> {
        let mut subscribers = self.subscribers.write().await;
        let sender = subscribers
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(SUBSCRIPTION_CAPACITY).0);
        Ok(sender.subscribe())
    }
}
