//! Problem catalog adapters.

pub mod cached;
pub mod in_memory;

pub use cached::CachedProblemCatalog;
pub use in_memory::InMemoryProblemCatalog;
