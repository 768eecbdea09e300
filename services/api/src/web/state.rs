//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-document chat
//! session registry.

use crate::config::Config;
use docchat_core::ingest::IngestionPipeline;
use docchat_core::ports::{AnswerEngine, BlobStore, DocumentStore};
use docchat_core::session::ChatSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub engine: Arc<dyn AnswerEngine>,
    pub pipeline: Arc<IngestionPipeline>,
    pub config: Arc<Config>,
    /// One chat session per active document, created lazily on first ask.
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<ChatSession>>>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        engine: Arc<dyn AnswerEngine>,
        pipeline: Arc<IngestionPipeline>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            store,
            blobs,
            engine,
            pipeline,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the chat session for a document, creating it on first use.
    /// The registry lock is held only for the lookup; callers lock the
    /// session itself for transitions.
    pub async fn session_for(&self, document_id: Uuid) -> Arc<Mutex<ChatSession>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(document_id)
            .or_insert_with(|| Arc::new(Mutex::new(ChatSession::new(document_id))))
            .clone()
    }
}
