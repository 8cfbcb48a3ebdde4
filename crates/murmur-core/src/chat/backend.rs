//! Chat backend trait.
//!
//! Defines the interface to the remote chat service.

use super::model::{ChatReply, Conversation, ConversationWithMessages};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract client for the remote chat service.
///
/// This trait decouples the synchronization logic from the concrete HTTP
/// transport, so use cases can be exercised against an in-memory fake.
///
/// Failure semantics are deliberately coarse: every operation either
/// resolves or fails with a single generic backend error. There is no
/// timeout, retry, or cancellation at this layer.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends a user message to a conversation and returns the assistant
    /// reply with its sources.
    async fn send_message(&self, conversation_id: &str, message: &str) -> Result<ChatReply>;

    /// Creates a new conversation.
    ///
    /// # Arguments
    ///
    /// * `title` - Optional title; the service defaults to "New Chat"
    async fn create_conversation(&self, title: Option<&str>) -> Result<Conversation>;

    /// Lists all conversations in server-provided recency order
    /// (most recently updated first).
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Fetches a conversation together with its full message history.
    async fn conversation_history(&self, conversation_id: &str)
        -> Result<ConversationWithMessages>;

    /// Deletes a conversation. Side effect only; deleting an unknown id is
    /// an error surfaced by the service.
    async fn delete_conversation(&self, conversation_id: &str) -> Result<()>;

    /// Renames a conversation. The response body is ignored; callers treat
    /// this as best-effort.
    async fn update_title(&self, conversation_id: &str, title: &str) -> Result<()>;
}
