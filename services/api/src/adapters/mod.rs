pub mod fs_blob;
pub mod memory_store;
pub mod openai_qa;
pub mod pdf;
pub mod scripted_qa;

pub use fs_blob::FsBlobStore;
pub use memory_store::InMemoryDocumentStore;
pub use openai_qa::OpenAiAnswerEngine;
pub use pdf::LopdfParser;
pub use scripted_qa::ScriptedAnswerEngine;
