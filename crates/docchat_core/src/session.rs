//! crates/docchat_core/src/session.rs
//!
//! The per-document chat session: an ordered, append-only message log and
//! the Idle/Pending state machine that guards it. The asynchronous answer
//! call itself lives in the web layer; this module only defines the legal
//! transitions around it.

use crate::domain::{ChatMessage, Citation, MessageRole};
use uuid::Uuid;

/// The user-visible text appended when an answer computation fails.
pub const ANSWER_FAILURE_TEXT: &str =
    "Sorry, I encountered an error processing your question. Please try again.";

/// Errors produced by session transitions.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    /// A question is already in flight for this session.
    #[error("A question is already being answered for this session")]
    Busy,
}

/// Whether an answer computation is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Pending,
}

/// The ordered conversation state for one active document.
///
/// Every `ask` cycle is `Idle -> Pending -> Idle`; there are no other
/// states. At most one answer computation may be in flight at a time, so a
/// `begin_ask` while `Pending` is rejected with [`SessionError::Busy`].
#[derive(Debug)]
pub struct ChatSession {
    document_id: Uuid,
    messages: Vec<ChatMessage>,
    status: SessionStatus,
    next_seq: u64,
}

impl ChatSession {
    pub fn new(document_id: Uuid) -> Self {
        Self {
            document_id,
            messages: Vec::new(),
            status: SessionStatus::Idle,
            next_seq: 0,
        }
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The full message log, in creation order.
    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Starts an ask cycle: appends the user message immediately (so the
    /// log reflects input order even under latency) and marks the session
    /// pending for the duration of the answer computation.
    pub fn begin_ask(&mut self, question: &str) -> Result<(), SessionError> {
        if self.status == SessionStatus::Pending {
            return Err(SessionError::Busy);
        }
        self.append(MessageRole::User, question.to_string(), Vec::new(), false);
        self.status = SessionStatus::Pending;
        Ok(())
    }

    /// Records a successful answer and returns the session to idle.
    pub fn complete(&mut self, text: String, citations: Vec<Citation>) -> ChatMessage {
        self.status = SessionStatus::Idle;
        self.append(MessageRole::Assistant, text, citations, false)
    }

    /// Records an answer failure as a visible assistant message and returns
    /// the session to idle; the session stays usable for later questions.
    pub fn fail(&mut self) -> ChatMessage {
        self.status = SessionStatus::Idle;
        self.append(
            MessageRole::Assistant,
            ANSWER_FAILURE_TEXT.to_string(),
            Vec::new(),
            true,
        )
    }

    /// Aborts an in-flight ask without appending an assistant message.
    pub fn cancel(&mut self) {
        self.status = SessionStatus::Idle;
    }

    fn append(
        &mut self,
        role: MessageRole,
        text: String,
        citations: Vec<Citation>,
        is_error: bool,
    ) -> ChatMessage {
        let message = ChatMessage {
            seq: self.next_seq,
            role,
            text,
            created_at: chrono::Utc::now(),
            citations,
            is_error,
        };
        self.next_seq += 1;
        self.messages.push(message.clone());
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ChatSession {
        ChatSession::new(Uuid::new_v4())
    }

    #[test]
    fn begin_ask_appends_user_message_and_goes_pending() {
        let mut s = session();
        s.begin_ask("What is this document about?").unwrap();
        assert_eq!(s.status(), SessionStatus::Pending);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0].role, MessageRole::User);
        assert_eq!(s.history()[0].text, "What is this document about?");
    }

    #[test]
    fn second_ask_while_pending_is_busy_and_appends_nothing() {
        let mut s = session();
        s.begin_ask("first").unwrap();
        assert_eq!(s.begin_ask("second"), Err(SessionError::Busy));
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn complete_appends_assistant_reply_and_returns_to_idle() {
        let mut s = session();
        s.begin_ask("q").unwrap();
        let reply = s.complete(
            "an answer".to_string(),
            vec![Citation {
                page: 1,
                snippet: None,
            }],
        );
        assert_eq!(s.status(), SessionStatus::Idle);
        assert_eq!(reply.role, MessageRole::Assistant);
        assert!(!reply.is_error);
        assert_eq!(s.history().len(), 2);
        // A new ask is accepted once the first completes.
        s.begin_ask("q2").unwrap();
    }

    #[test]
    fn fail_appends_error_message_and_returns_to_idle() {
        let mut s = session();
        s.begin_ask("q").unwrap();
        let reply = s.fail();
        assert!(reply.is_error);
        assert_eq!(reply.text, ANSWER_FAILURE_TEXT);
        assert_eq!(s.status(), SessionStatus::Idle);
    }

    #[test]
    fn cancel_returns_to_idle_without_assistant_message() {
        let mut s = session();
        s.begin_ask("q").unwrap();
        s.cancel();
        assert_eq!(s.status(), SessionStatus::Idle);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn message_seqs_are_strictly_increasing() {
        let mut s = session();
        s.begin_ask("q1").unwrap();
        s.complete("a1".to_string(), Vec::new());
        s.begin_ask("q2").unwrap();
        s.fail();
        let seqs: Vec<u64> = s.history().iter().map(|m| m.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
    }
}
