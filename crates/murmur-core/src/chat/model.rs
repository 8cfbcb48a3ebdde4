//! Conversation domain models.
//!
//! These types mirror the remote service's JSON contract: conversations are
//! server-persisted and identified by an opaque id; the client never mints
//! ids or reorders the server-provided listing.

use super::message::Message;
use serde::{Deserialize, Serialize};

/// A named, server-persisted thread of messages.
///
/// Identity is `id`; the title is mutable (the service renames a
/// conversation after its first message).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Opaque server-assigned identifier
    pub id: String,
    /// Human-readable conversation title
    pub title: String,
    /// Timestamp when the conversation was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the conversation was last updated (ISO 8601 format)
    pub updated_at: String,
}

/// A conversation together with its full message history,
/// chronological (insertion order = display order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationWithMessages {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    pub messages: Vec<Message>,
}

/// The remote service's reply to a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant response text
    pub message: String,
    /// Source URLs backing the response, in ranked order
    #[serde(default)]
    pub sources: Vec<String>,
    /// The conversation the reply belongs to
    pub conversation_id: String,
}
