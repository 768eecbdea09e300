pub mod domain;
pub mod ingest;
pub mod ports;
pub mod session;
pub mod viewer;

pub use domain::{ChatMessage, Citation, Document, MessageRole};
pub use ingest::{IngestError, IngestionPipeline, DEFAULT_MAX_SIZE_BYTES, PDF_MIME_TYPE};
pub use ports::{
    AnswerEngine, BlobStore, DocumentParser, DocumentStore, EngineAnswer, ParsedDocument,
    PortError, PortResult,
};
pub use session::{ChatSession, SessionError, SessionStatus, ANSWER_FAILURE_TEXT};
pub use viewer::{LoadStatus, ViewerState};
