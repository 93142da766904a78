//! Mistake-memory adapters.

pub mod in_memory;
pub mod null;

pub use in_memory::InMemoryMistakeMemory;
pub use null::NullMistakeMemory;
