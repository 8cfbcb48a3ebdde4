//! Client-side conversation state container.

use super::message::Message;
use super::model::Conversation;

/// Holds the client-side view of the chat session: the active conversation
/// id, its message thread, the known conversation list, and a loading flag.
///
/// `ChatStore` is a pure state container. Every operation is synchronous and
/// total, reads no network, and leaves the store in a consistent snapshot.
/// It is owned by the composition root and mutated only by the use case
/// layer; the UI reads it through the accessors.
///
/// Invariants upheld by callers:
/// - the thread corresponds to `current_conversation_id`; switching
///   conversations replaces both together
/// - the conversation list keeps server order; it is replaced wholesale on
///   refresh, never reordered locally
#[derive(Debug, Clone, Default)]
pub struct ChatStore {
    current_conversation_id: Option<String>,
    messages: Vec<Message>,
    conversations: Vec<Conversation>,
    is_loading: bool,
}

impl ChatStore {
    /// Creates an empty store: no active conversation, empty thread and
    /// list, not loading.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of the active conversation, if any.
    pub fn current_conversation_id(&self) -> Option<&str> {
        self.current_conversation_id.as_deref()
    }

    /// The active conversation's message thread, in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The known conversations, in server-provided recency order.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Whether a send operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Sets the active conversation id.
    pub fn set_current_conversation(&mut self, id: impl Into<String>) {
        self.current_conversation_id = Some(id.into());
    }

    /// Replaces the message thread wholesale.
    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Appends one message to the end of the thread.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the conversation list wholesale.
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    /// Toggles the loading flag.
    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    /// Empties the message thread.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }
}
