//! crates/docchat_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An ingested document: extracted content plus display metadata.
///
/// Immutable after creation. The id is the only handle other components
/// use to address the document; it is never derived from the uploaded
/// filename, which is untrusted and kept for display only.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub text: String,
    pub page_count: u32,
    pub uploaded_at: DateTime<Utc>,
}

/// A reference from an answer to a specific page of a document.
///
/// Carries no document content; the page number is resolved against the
/// document when the citation is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// 1-indexed target page.
    pub page: u32,
    /// Optional explanatory snippet shown alongside the citation.
    pub snippet: Option<String>,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single entry in a chat session's message log.
///
/// Messages are strictly ordered by `seq` within a session and are never
/// mutated or reordered after creation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Unique within the session, assigned in creation order.
    pub seq: u64,
    pub role: MessageRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub citations: Vec<Citation>,
    pub is_error: bool,
}
