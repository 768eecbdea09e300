//! services/api/src/web/chat_task.rs
//!
//! This module contains the asynchronous task responsible for one
//! question-and-answer cycle: the Idle -> Pending -> Idle transition around
//! the answer engine call, citation clamping, and cancellation.

use docchat_core::domain::{ChatMessage, Citation, Document};
use docchat_core::ports::AnswerEngine;
use docchat_core::session::{ChatSession, SessionError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Why an ask cycle produced no assistant reply.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AskError {
    /// Another question is already in flight on this session.
    #[error("A question is already being answered for this session")]
    Busy,
    /// The caller aborted the ask before the engine finished.
    #[error("The question was cancelled before an answer was produced")]
    Cancelled,
}

/// Runs one full ask cycle against a session.
///
/// The session lock is held only for state transitions, never across the
/// engine call, so unrelated sessions are never blocked. Whatever the
/// engine does, the session ends the cycle back in `Idle`: success appends
/// the assistant reply, engine failure appends a visible error message,
/// and cancellation appends nothing.
pub async fn run_ask(
    engine: Arc<dyn AnswerEngine>,
    session: Arc<Mutex<ChatSession>>,
    document: &Document,
    question: &str,
    cancel: CancellationToken,
) -> Result<ChatMessage, AskError> {
    {
        let mut session = session.lock().await;
        session.begin_ask(question).map_err(|e| match e {
            SessionError::Busy => AskError::Busy,
        })?;
    }

    let engine_result = tokio::select! {
        result = engine.answer(question, document) => Some(result),
        _ = cancel.cancelled() => None,
    };

    let mut session = session.lock().await;
    match engine_result {
        Some(Ok(answer)) => {
            let citations = clamp_citations(answer.citations, document.page_count);
            Ok(session.complete(answer.text, citations))
        }
        Some(Err(e)) => {
            warn!(document_id = %document.id, "Answer engine failed: {}", e);
            Ok(session.fail())
        }
        None => {
            session.cancel();
            Err(AskError::Cancelled)
        }
    }
}

/// Forces every citation into `[1, page_count]`. Out-of-range pages are
/// clamped to the nearest valid page rather than dropped, one policy for
/// every engine.
fn clamp_citations(citations: Vec<Citation>, page_count: u32) -> Vec<Citation> {
    citations
        .into_iter()
        .map(|c| Citation {
            page: c.page.clamp(1, page_count),
            snippet: c.snippet,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docchat_core::domain::MessageRole;
    use docchat_core::ports::{EngineAnswer, PortError, PortResult};
    use docchat_core::session::{SessionStatus, ANSWER_FAILURE_TEXT};
    use std::time::Duration;
    use uuid::Uuid;

    fn document(pages: u32) -> Document {
        Document {
            id: Uuid::new_v4(),
            filename: "resume.pdf".to_string(),
            text: "skills".to_string(),
            page_count: pages,
            uploaded_at: chrono::Utc::now(),
        }
    }

    fn session_for(doc: &Document) -> Arc<Mutex<ChatSession>> {
        Arc::new(Mutex::new(ChatSession::new(doc.id)))
    }

    /// Engine returning a canned answer, optionally after a delay.
    struct CannedEngine {
        answer: EngineAnswer,
        delay: Duration,
    }

    #[async_trait]
    impl AnswerEngine for CannedEngine {
        async fn answer(&self, _q: &str, _d: &Document) -> PortResult<EngineAnswer> {
            tokio::time::sleep(self.delay).await;
            Ok(self.answer.clone())
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl AnswerEngine for FailingEngine {
        async fn answer(&self, _q: &str, _d: &Document) -> PortResult<EngineAnswer> {
            Err(PortError::Unexpected("remote service unreachable".into()))
        }
    }

    fn canned(pages: Vec<u32>) -> Arc<CannedEngine> {
        Arc::new(CannedEngine {
            answer: EngineAnswer {
                text: "an answer".to_string(),
                citations: pages
                    .into_iter()
                    .map(|page| Citation {
                        page,
                        snippet: None,
                    })
                    .collect(),
            },
            delay: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn successful_ask_appends_user_then_assistant() {
        let doc = document(3);
        let session = session_for(&doc);
        let reply = run_ask(
            canned(vec![2]),
            session.clone(),
            &doc,
            "what are the main skills",
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(reply.citations[0].page, 2);

        let session = session.lock().await;
        assert_eq!(session.status(), SessionStatus::Idle);
        let roles: Vec<MessageRole> = session.history().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
    }

    #[tokio::test]
    async fn second_ask_while_pending_is_busy() {
        let doc = document(3);
        let session = session_for(&doc);
        let slow = Arc::new(CannedEngine {
            answer: EngineAnswer {
                text: "slow answer".to_string(),
                citations: Vec::new(),
            },
            delay: Duration::from_millis(200),
        });

        let first = tokio::spawn({
            let session = session.clone();
            let doc = doc.clone();
            async move {
                run_ask(slow, session, &doc, "first", CancellationToken::new()).await
            }
        });

        // Wait until the first ask has actually gone pending.
        loop {
            if session.lock().await.status() == SessionStatus::Pending {
                break;
            }
            tokio::task::yield_now().await;
        }

        let second = run_ask(
            canned(vec![1]),
            session.clone(),
            &doc,
            "second",
            CancellationToken::new(),
        )
        .await;
        assert_eq!(second.unwrap_err(), AskError::Busy);

        first.await.unwrap().unwrap();
        let session = session.lock().await;
        // Only the first exchange made it into the log.
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].text, "first");
    }

    #[tokio::test]
    async fn engine_failure_becomes_visible_error_message() {
        let doc = document(2);
        let session = session_for(&doc);
        let reply = run_ask(
            Arc::new(FailingEngine),
            session.clone(),
            &doc,
            "anything",
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(reply.is_error);
        assert_eq!(reply.text, ANSWER_FAILURE_TEXT);

        // The session is usable again afterwards.
        let next = run_ask(
            canned(vec![1]),
            session,
            &doc,
            "again",
            CancellationToken::new(),
        )
        .await
        .unwrap();
        assert!(!next.is_error);
    }

    #[tokio::test]
    async fn out_of_range_citations_are_clamped() {
        let doc = document(3);
        let session = session_for(&doc);
        let reply = run_ask(
            canned(vec![0, 2, 99]),
            session,
            &doc,
            "q",
            CancellationToken::new(),
        )
        .await
        .unwrap();

        let pages: Vec<u32> = reply.citations.iter().map(|c| c.page).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn cancellation_returns_to_idle_without_reply() {
        let doc = document(2);
        let session = session_for(&doc);
        let slow = Arc::new(CannedEngine {
            answer: EngineAnswer {
                text: "never delivered".to_string(),
                citations: Vec::new(),
            },
            delay: Duration::from_secs(30),
        });

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = run_ask(slow, session.clone(), &doc, "q", cancel).await;
        assert_eq!(result.unwrap_err(), AskError::Cancelled);

        let session = session.lock().await;
        assert_eq!(session.status(), SessionStatus::Idle);
        // Only the optimistic user message remains.
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].role, MessageRole::User);
    }
}
