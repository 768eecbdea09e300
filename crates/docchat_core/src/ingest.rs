//! crates/docchat_core/src/ingest.rs
//!
//! The ingestion pipeline: validates an uploaded byte stream, parses it,
//! persists the raw bytes, and creates the document record. This is the
//! only component that allocates document identifiers.

use crate::domain::Document;
use crate::ports::{BlobStore, DocumentParser, DocumentStore, PortError};
use bytes::Bytes;
use std::sync::Arc;
use uuid::Uuid;

/// The MIME type accepted by the pipeline.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// The default upload size limit (50 MiB).
pub const DEFAULT_MAX_SIZE_BYTES: usize = 50 * 1024 * 1024;

/// Errors produced by [`IngestionPipeline::ingest`].
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Unsupported file type '{0}', only {PDF_MIME_TYPE} is accepted")]
    UnsupportedType(String),
    #[error("File is {actual} bytes, which exceeds the {limit} byte limit")]
    TooLarge { actual: usize, limit: usize },
    #[error("Failed to parse document: {0}")]
    ParseFailure(String),
    #[error("Failed to persist document: {0}")]
    Storage(#[from] PortError),
}

/// Validates, parses, and stores one upload.
///
/// Holds its collaborators as shared ports so independent ingestions can
/// run concurrently; the document store is the only shared mutable state.
pub struct IngestionPipeline {
    parser: Arc<dyn DocumentParser>,
    blobs: Arc<dyn BlobStore>,
    store: Arc<dyn DocumentStore>,
    max_size_bytes: usize,
}

impl IngestionPipeline {
    pub fn new(
        parser: Arc<dyn DocumentParser>,
        blobs: Arc<dyn BlobStore>,
        store: Arc<dyn DocumentStore>,
        max_size_bytes: usize,
    ) -> Self {
        Self {
            parser,
            blobs,
            store,
            max_size_bytes,
        }
    }

    /// Runs the full ingestion cycle for one upload.
    ///
    /// Validation is fail-fast, first violation wins: declared MIME type,
    /// then size, then parse. A parse that reports zero pages is rejected
    /// as a parse failure, since every stored document must have at least
    /// one page.
    pub async fn ingest(
        &self,
        raw: Bytes,
        declared_mime: &str,
        original_filename: &str,
    ) -> Result<Document, IngestError> {
        if declared_mime != PDF_MIME_TYPE {
            return Err(IngestError::UnsupportedType(declared_mime.to_string()));
        }
        if raw.len() > self.max_size_bytes {
            return Err(IngestError::TooLarge {
                actual: raw.len(),
                limit: self.max_size_bytes,
            });
        }

        let parsed = self
            .parser
            .parse(&raw)
            .await
            .map_err(|e| IngestError::ParseFailure(e.to_string()))?;
        if parsed.page_count == 0 {
            return Err(IngestError::ParseFailure(
                "document contains no pages".to_string(),
            ));
        }

        // The identifier is freshly generated, never derived from the
        // user-supplied filename.
        let id = Uuid::new_v4();
        self.blobs.put(id, raw).await?;

        let document = Document {
            id,
            filename: original_filename.to_string(),
            text: parsed.text,
            page_count: parsed.page_count,
            uploaded_at: chrono::Utc::now(),
        };
        if let Err(e) = self.store.put(document.clone()).await {
            // Nothing references the blob if the record never lands, so
            // clean it up best-effort before surfacing the failure.
            let _ = self.blobs.delete(id).await;
            return Err(e.into());
        }

        Ok(document)
    }
}
