//! Port trait definitions (Hexagonal Architecture)
//!
//! Async interfaces implemented by infrastructure and adapter code:
//! - ChatProvider / ChatModel: chat-completion backends and routed models
//! - ResponseCache: storage for structured agent results
//! - MemoryRetriever / MemoryStore: the user's mistake memory
//! - ProblemCatalog / UserProfileStore: problem and profile lookups

pub mod chat_model;
pub mod memory;
pub mod problem_catalog;
pub mod profile_store;
pub mod response_cache;

pub use chat_model::{ChatMessage, ChatModel, ChatModelFactory, ChatProvider, Role};
pub use memory::{MemoryRetriever, MemoryStore};
pub use problem_catalog::ProblemCatalog;
pub use profile_store::UserProfileStore;
pub use response_cache::ResponseCache;
