//! services/api/src/adapters/pdf.rs
//!
//! The PDF implementation of the `DocumentParser` port, built on `lopdf`.
//! Extracts the page count and per-page text for the ingestion pipeline.

use async_trait::async_trait;
use docchat_core::ports::{DocumentParser, ParsedDocument, PortError, PortResult};

/// Parses uploaded PDFs with `lopdf`.
#[derive(Default)]
pub struct LopdfParser;

impl LopdfParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_sync(raw: &[u8]) -> PortResult<ParsedDocument> {
        let doc = lopdf::Document::load_mem(raw)
            .map_err(|e| PortError::Unexpected(format!("failed to parse PDF: {}", e)))?;

        let mut pages: Vec<u32> = doc.get_pages().keys().cloned().collect();
        pages.sort();

        let mut text = String::new();
        for page_num in &pages {
            // A page that yields no text (e.g. scanned images) is fine;
            // the page still counts.
            let page_text = doc.extract_text(&[*page_num]).unwrap_or_default();
            text.push_str(&page_text);
            if !page_text.ends_with('\n') && !page_text.is_empty() {
                text.push('\n');
            }
        }

        Ok(ParsedDocument {
            text,
            page_count: pages.len() as u32,
        })
    }
}

#[async_trait]
impl DocumentParser for LopdfParser {
    /// Parsing is CPU-bound, so it runs on the blocking pool to keep the
    /// runtime free for unrelated sessions.
    async fn parse(&self, raw: &[u8]) -> PortResult<ParsedDocument> {
        let raw = raw.to_vec();
        tokio::task::spawn_blocking(move || Self::parse_sync(&raw))
            .await
            .map_err(|e| PortError::Unexpected(format!("parser task failed: {}", e)))?
    }
}
