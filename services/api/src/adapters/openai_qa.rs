//! services/api/src/adapters/openai_qa.rs
//!
//! This module contains the model-backed adapter for the `AnswerEngine`
//! port, used when an OpenAI API key is configured. The model is asked to
//! mark cited pages inline as `[page N]`; those markers are stripped from
//! the answer text and turned into citations.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a document assistant answering questions about an uploaded PDF.

You receive the document's extracted text and its page count, followed by the user's question.

Rules:
- Answer only from the document text. If the document does not contain the answer, say so briefly.
- Keep answers to a few sentences, in plain conversational prose.
- When part of your answer is supported by a specific page, mark it inline with a citation of the form [page N], where N is a 1-indexed page number no greater than the stated page count.
- Emit at most one citation marker per supported claim, and no citations at all if the document does not support the answer."#;

const USER_INPUT_TEMPLATE: &str = r#"DOCUMENT ({page_count} pages):
---
{document}
---

QUESTION:
{question}"#;

use async_openai::{config::OpenAIConfig, types::responses::CreateResponseArgs, Client};
use async_trait::async_trait;
use docchat_core::domain::{Citation, Document};
use docchat_core::ports::{AnswerEngine, EngineAnswer, PortError, PortResult};
use regex::Regex;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `AnswerEngine` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAnswerEngine {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAnswerEngine {
    /// Creates a new `OpenAiAnswerEngine`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Splits a raw model answer into clean text plus the pages it cited,
    /// in order of first appearance and de-duplicated.
    fn extract_citations(raw: &str) -> (String, Vec<Citation>) {
        let marker = Regex::new(r"\[page\s+(\d+)\]").unwrap();

        let mut pages = Vec::new();
        for capture in marker.captures_iter(raw) {
            if let Ok(page) = capture[1].parse::<u32>() {
                if !pages.contains(&page) {
                    pages.push(page);
                }
            }
        }

        let text = marker
            .replace_all(raw, "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let citations = pages
            .into_iter()
            .map(|page| Citation {
                page,
                snippet: Some(format!("Cited from page {}", page)),
            })
            .collect();
        (text, citations)
    }
}

//=========================================================================================
// `AnswerEngine` Trait Implementation
//=========================================================================================

#[async_trait]
impl AnswerEngine for OpenAiAnswerEngine {
    /// Answers a user's question against the document's extracted text.
    async fn answer(&self, question: &str, document: &Document) -> PortResult<EngineAnswer> {
        let user_input = USER_INPUT_TEMPLATE
            .replace("{page_count}", &document.page_count.to_string())
            .replace("{document}", &document.text)
            .replace("{question}", question);

        let request = CreateResponseArgs::default()
            .model(&self.model)
            .instructions(SYSTEM_INSTRUCTIONS)
            .input(user_input)
            .max_output_tokens(1000u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .responses()
            .create(request)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let raw_answer = response.output_text().unwrap_or_default();
        let (text, citations) = Self::extract_citations(&raw_answer);

        Ok(EngineAnswer { text, citations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_markers_into_ordered_citations() {
        let (text, citations) = OpenAiAnswerEngine::extract_citations(
            "The candidate lists Rust [page 2] and earlier roles [page 5].",
        );
        assert_eq!(text, "The candidate lists Rust and earlier roles .");
        let pages: Vec<u32> = citations.iter().map(|c| c.page).collect();
        assert_eq!(pages, vec![2, 5]);
    }

    #[test]
    fn duplicate_markers_cite_once() {
        let (_, citations) =
            OpenAiAnswerEngine::extract_citations("Skills [page 1], more skills [page 1].");
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].page, 1);
    }

    #[test]
    fn answers_without_markers_have_no_citations() {
        let (text, citations) =
            OpenAiAnswerEngine::extract_citations("The document does not say.");
        assert_eq!(text, "The document does not say.");
        assert!(citations.is_empty());
    }
}
