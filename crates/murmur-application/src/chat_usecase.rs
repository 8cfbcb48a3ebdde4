//! Chat use case implementation.
//!
//! `ChatUseCase` orchestrates the `ChatStore` and a `ChatBackend` to keep
//! the conversation list and the active thread consistent with the remote
//! service, handling optimistic updates, loading state, and error fallback.

use murmur_core::chat::{ChatBackend, ChatStore, Message};
use murmur_core::error::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed assistant reply recorded in the thread when a send fails.
///
/// The failure becomes part of the visible conversation history instead of
/// being silently discarded or rolled back.
pub const SEND_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Maximum title length, in characters, derived from the first message.
const TITLE_MAX_CHARS: usize = 50;

/// Derives a conversation title from its first user message.
///
/// Messages of up to 50 characters become the title verbatim; longer
/// messages are cut to the first 50 characters with a `...` marker.
/// Truncation counts characters, not bytes, so multibyte input is safe.
pub fn derive_title(message: &str) -> String {
    if message.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = message.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", truncated)
    } else {
        message.to_string()
    }
}

/// Use case driving the conversation lifecycle against the remote service.
///
/// The store is owned here and injected at construction together with the
/// backend, so the synchronization logic is testable without any UI.
///
/// # Error policy
///
/// Public operations never propagate errors. List and history failures
/// trigger the documented fallback (a fresh conversation) or are logged;
/// send failures surface to the user as a synthetic assistant message;
/// title updates and post-send list refreshes are best-effort and their
/// failures are swallowed with a warning. There is no retry or backoff.
///
/// # Concurrency
///
/// Methods take `&mut self`, so operations are serialized by construction:
/// a caller cannot start a second send while one is awaiting the backend.
pub struct ChatUseCase {
    store: ChatStore,
    backend: Arc<dyn ChatBackend>,
}

impl ChatUseCase {
    /// Creates a use case with an empty store over the given backend.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            store: ChatStore::new(),
            backend,
        }
    }

    /// Read access to the client-side state, for rendering.
    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    /// Startup flow: load the conversation list and activate the most
    /// recent conversation, populating its thread from history.
    ///
    /// Falls back to [`Self::new_chat`] when the list is empty or when the
    /// list or history fetch fails; a listing failure must not leave the
    /// user without an active conversation.
    pub async fn initialize(&mut self) {
        match self.load_most_recent().await {
            Ok(true) => {}
            Ok(false) => self.new_chat().await,
            Err(err) => {
                warn!("Failed to load conversations: {}", err);
                self.new_chat().await;
            }
        }
    }

    async fn load_most_recent(&mut self) -> Result<bool> {
        let conversations = self.backend.list_conversations().await?;
        self.store.set_conversations(conversations);

        let Some(most_recent) = self.store.conversations().first() else {
            return Ok(false);
        };
        let id = most_recent.id.clone();

        self.store.set_current_conversation(id.clone());
        let history = self.backend.conversation_history(&id).await?;
        self.store.set_messages(history.messages);
        info!("Resumed conversation {}", id);
        Ok(true)
    }

    /// New Chat flow: create a conversation remotely, make it current with
    /// an empty thread, then refresh the conversation list so the new entry
    /// appears in server order.
    ///
    /// There is no rollback path: if creation fails the error is logged and
    /// whatever conversation was previously active (or none) remains.
    pub async fn new_chat(&mut self) {
        match self.backend.create_conversation(None).await {
            Ok(conversation) => {
                info!("Created conversation {}", conversation.id);
                self.store.set_current_conversation(conversation.id);
                self.store.clear_messages();
                self.refresh_conversations().await;
            }
            Err(err) => warn!("Failed to create conversation: {}", err),
        }
    }

    /// Activates a conversation and replaces the thread wholesale with its
    /// fetched history.
    ///
    /// On a history-fetch failure the id update is not rolled back: the
    /// store keeps the new id with the previous thread, stale but not
    /// corrupted, until a later fetch succeeds.
    pub async fn select_conversation(&mut self, conversation_id: &str) {
        self.store.set_current_conversation(conversation_id);
        match self.backend.conversation_history(conversation_id).await {
            Ok(history) => self.store.set_messages(history.messages),
            Err(err) => warn!("Failed to load conversation {}: {}", conversation_id, err),
        }
    }

    /// Send flow: optimistic user append, backend call, reconciliation.
    ///
    /// No-op when no conversation is active: no network call, no append.
    /// On success the assistant reply (content + sources) is appended; if
    /// this was the conversation's first message, the conversation is
    /// renamed after it (best-effort) and the list refreshed. On failure a
    /// synthetic assistant message records the error in the thread. The
    /// loading flag clears on every path.
    pub async fn send_message(&mut self, message: &str) {
        let Some(conversation_id) = self.store.current_conversation_id().map(str::to_string)
        else {
            return;
        };

        let first_message = self.store.messages().is_empty();
        self.store.add_message(Message::user(message));
        self.store.set_loading(true);

        match self.backend.send_message(&conversation_id, message).await {
            Ok(reply) => {
                self.store
                    .add_message(Message::assistant(reply.message, Some(reply.sources)));

                if first_message {
                    self.rename_after_first_message(&conversation_id, message).await;
                    self.refresh_conversations().await;
                }
            }
            Err(err) => {
                warn!("Failed to send message: {}", err);
                self.store.add_message(Message::assistant(SEND_ERROR_REPLY, None));
            }
        }

        self.store.set_loading(false);
    }

    /// Delete flow: remove the conversation remotely and refresh the list.
    ///
    /// Confirmation is the caller's responsibility. If the deleted
    /// conversation was active, the New Chat flow runs so the client never
    /// points at a deleted conversation.
    pub async fn delete_conversation(&mut self, conversation_id: &str) {
        if let Err(err) = self.backend.delete_conversation(conversation_id).await {
            warn!("Failed to delete conversation {}: {}", conversation_id, err);
            return;
        }
        info!("Deleted conversation {}", conversation_id);

        self.refresh_conversations().await;

        if self.store.current_conversation_id() == Some(conversation_id) {
            self.new_chat().await;
        }
    }

    /// Best-effort rename from the first user message. Failure is cosmetic:
    /// it is logged and does not affect the message flow.
    async fn rename_after_first_message(&mut self, conversation_id: &str, message: &str) {
        let title = derive_title(message);
        if let Err(err) = self.backend.update_title(conversation_id, &title).await {
            warn!("Failed to update title for {}: {}", conversation_id, err);
        }
    }

    /// Best-effort list refresh, replacing the list wholesale in server
    /// order. On failure the store keeps the previous list.
    async fn refresh_conversations(&mut self) {
        match self.backend.list_conversations().await {
            Ok(conversations) => self.store.set_conversations(conversations),
            Err(err) => warn!("Failed to refresh conversations: {}", err),
        }
    }
}
