pub mod chat_task;
pub mod rest;
pub mod state;

// Re-export the handlers so the binary can build the router without
// reaching into submodules.
pub use rest::{
    chat_handler, get_document_handler, health_handler, raw_document_handler, upload_handler,
};
pub use state::AppState;
