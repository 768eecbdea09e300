//! crates/docchat_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like storage or LLM APIs.

use crate::domain::{Citation, Document};
use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The single source of truth for document records.
///
/// `put` must be atomic: a concurrent `get` observes either no record or a
/// fully constructed one, never a partial write. No update or delete is
/// exposed; documents are immutable once stored.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, document: Document) -> PortResult<()>;
    async fn get(&self, id: Uuid) -> PortResult<Document>;
}

/// Storage for the originally uploaded bytes, addressed by document id only.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, id: Uuid, raw: Bytes) -> PortResult<()>;
    async fn get(&self, id: Uuid) -> PortResult<Bytes>;
    /// Removes a stored blob. Deleting an id that was never stored is not
    /// an error.
    async fn delete(&self, id: Uuid) -> PortResult<()>;
}

/// The result of parsing an uploaded file.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub text: String,
    pub page_count: u32,
}

#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Extracts the full text and page count from raw file bytes.
    async fn parse(&self, raw: &[u8]) -> PortResult<ParsedDocument>;
}

/// An answer produced by the answer engine.
#[derive(Debug, Clone)]
pub struct EngineAnswer {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// The pluggable intelligence boundary.
///
/// Implementations must be deterministic: the same question against the
/// same document always yields the same answer and citations. Cited pages
/// should fall within `[1, document.page_count]`; the chat layer clamps
/// anything outside that range before it reaches a viewer.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    async fn answer(&self, question: &str, document: &Document) -> PortResult<EngineAnswer>;
}
