//! services/api/src/adapters/scripted_qa.rs
//!
//! A scripted implementation of the `AnswerEngine` port: a fixed,
//! ordered table of trigger phrases matched case-insensitively against
//! the question. This is the default engine when no model API key is
//! configured, and the fixture the compatibility tests run against.

use async_trait::async_trait;
use docchat_core::domain::{Citation, Document};
use docchat_core::ports::{AnswerEngine, EngineAnswer, PortResult};

/// The answer returned when no trigger phrase matches.
pub const FALLBACK_ANSWER: &str = "I can help you with questions about this document. \
     Try asking about the candidate's skills, education, or work experience.";

const CITATION_SNIPPET: &str = "Relevant information found on page 1";

/// Trigger table, scanned top to bottom; the first phrase contained in the
/// lower-cased question wins, so the order here is part of the contract.
const RESPONSES: &[(&str, &str)] = &[
    (
        "what is this document about",
        "This document appears to be a resume for Sagar Bhogavta, a full-stack web developer \
         with experience in React, Angular, Node.js, and Next.js.",
    ),
    (
        "what are the main skills",
        "The candidate has skills in JavaScript, Python, TypeScript, C#, React, Angular, \
         Express.js, Flask, Django, Node.js, MongoDB, MySQL, NoSQL, AWS, Azure, Docker, \
         Kubernetes, GitHub, Postman, and Datadog.",
    ),
    (
        "what is the education background",
        "The candidate has a Post Graduate Certificate in Computer Applications Security from \
         Conestoga College (May 2023 - Dec 2023) and a Post Graduate Certificate in Computer \
         Applications Development from Conestoga College (May 2022 - April 2023).",
    ),
    (
        "what is the work experience",
        "The candidate has worked as a Full-Stack Developer (Remote) at FoodReady, Chicago, USA \
         (Jan 2024 - April 2024), Application Developer Intern at Covan Group, Waterloo, Ontario \
         (Jan 2023 - April 2023), and Web Developer at Tetrad DigiTech, Rajkot, Gujarat \
         (May 2021 - May 2022).",
    ),
];

/// An answer engine driven by the fixed trigger table above.
#[derive(Default)]
pub struct ScriptedAnswerEngine;

impl ScriptedAnswerEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnswerEngine for ScriptedAnswerEngine {
    async fn answer(&self, question: &str, _document: &Document) -> PortResult<EngineAnswer> {
        let normalized = question.to_lowercase();
        for (trigger, answer) in RESPONSES {
            if normalized.contains(trigger) {
                return Ok(EngineAnswer {
                    text: (*answer).to_string(),
                    citations: vec![Citation {
                        page: 1,
                        snippet: Some(CITATION_SNIPPET.to_string()),
                    }],
                });
            }
        }
        Ok(EngineAnswer {
            text: FALLBACK_ANSWER.to_string(),
            citations: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn document() -> Document {
        Document {
            id: Uuid::new_v4(),
            filename: "resume.pdf".to_string(),
            text: "skills and experience of the candidate".to_string(),
            page_count: 2,
            uploaded_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn matching_question_returns_answer_with_page_one_citation() {
        let engine = ScriptedAnswerEngine::new();
        let doc = document();
        let answer = engine
            .answer("What are the main skills?", &doc)
            .await
            .unwrap();
        assert!(answer.text.contains("JavaScript"));
        assert_eq!(answer.citations.len(), 1);
        assert_eq!(answer.citations[0].page, 1);
        assert!(answer.citations[0].page >= 1 && answer.citations[0].page <= doc.page_count);
    }

    #[tokio::test]
    async fn matching_is_case_insensitive_substring() {
        let engine = ScriptedAnswerEngine::new();
        let answer = engine
            .answer("Hey, WHAT IS THIS DOCUMENT ABOUT exactly?", &document())
            .await
            .unwrap();
        assert!(answer.text.contains("resume"));
    }

    #[tokio::test]
    async fn unmatched_question_returns_fallback_with_no_citations() {
        let engine = ScriptedAnswerEngine::new();
        let answer = engine
            .answer("xyzzy unrelated gibberish", &document())
            .await
            .unwrap();
        assert_eq!(answer.text, FALLBACK_ANSWER);
        assert!(answer.citations.is_empty());
    }

    #[tokio::test]
    async fn answers_are_deterministic() {
        let engine = ScriptedAnswerEngine::new();
        let doc = document();
        let first = engine
            .answer("what is the work experience", &doc)
            .await
            .unwrap();
        let second = engine
            .answer("what is the work experience", &doc)
            .await
            .unwrap();
        assert_eq!(first.text, second.text);
        assert_eq!(first.citations, second.citations);
    }

    #[tokio::test]
    async fn earlier_table_entries_win_over_later_ones() {
        let engine = ScriptedAnswerEngine::new();
        // Contains both the "document about" and "education" triggers; the
        // table order decides.
        let answer = engine
            .answer(
                "what is this document about and what is the education background",
                &document(),
            )
            .await
            .unwrap();
        assert!(answer.text.contains("resume"));
    }
}
