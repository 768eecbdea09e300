//! services/api/src/adapters/memory_store.rs
//!
//! An in-memory implementation of the `DocumentStore` port. Documents live
//! for the lifetime of the process; swapping in real persistence means
//! replacing this adapter, not its callers.

use async_trait::async_trait;
use docchat_core::domain::Document;
use docchat_core::ports::{DocumentStore, PortError, PortResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A document store backed by a process-local map.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<Uuid, Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    /// Inserts a fully constructed record under a single write lock, so a
    /// concurrent `get` never observes a partial document.
    async fn put(&self, document: Document) -> PortResult<()> {
        self.documents.write().await.insert(document.id, document);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> PortResult<Document> {
        self.documents
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("document {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        Document {
            id: Uuid::new_v4(),
            filename: "resume.pdf".to_string(),
            text: "text".to_string(),
            page_count: 2,
            uploaded_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn put_then_get_returns_the_document() {
        let store = InMemoryDocumentStore::new();
        let doc = document();
        store.put(doc.clone()).await.unwrap();
        let fetched = store.get(doc.id).await.unwrap();
        assert_eq!(fetched.id, doc.id);
        assert_eq!(fetched.page_count, 2);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }
}
