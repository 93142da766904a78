//! Chat provider adapters that need no network.

pub mod mock;

pub use mock::{MockChatProvider, MockReply};
