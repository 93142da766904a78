//! Adapters implementing the domain ports.

pub mod cache;
pub mod catalog;
pub mod llm;
pub mod memory;
pub mod profile;
