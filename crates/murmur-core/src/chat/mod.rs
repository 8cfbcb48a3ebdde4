//! Chat domain module.
//!
//! This module contains the conversation domain models, the client-side
//! state container, and the backend trait for the remote chat API.
//!
//! # Module Structure
//!
//! - `message`: Message types (`MessageRole`, `Message`)
//! - `model`: Conversation models (`Conversation`, `ConversationWithMessages`, `ChatReply`)
//! - `store`: Client-side state container (`ChatStore`)
//! - `backend`: Backend trait for the remote chat API (`ChatBackend`)

mod backend;
mod message;
mod model;
mod store;

// Re-export public API
pub use backend::ChatBackend;
pub use message::{Message, MessageRole};
pub use model::{ChatReply, Conversation, ConversationWithMessages};
pub use store::ChatStore;
