//! HTTP implementation of the chat backend.
//!
//! Talks to the remote chat service over HTTP+JSON. Transport failures and
//! non-2xx responses collapse into one generic backend error per operation;
//! no retry, timeout, or cancellation happens at this layer.

use async_trait::async_trait;
use murmur_core::chat::{ChatBackend, ChatReply, Conversation, ConversationWithMessages};
use murmur_core::error::{MurmurError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BackendConfig;

/// Client for the remote chat service's REST API.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Creates a backend from the given configuration.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Serialize)]
struct MessageRequest<'a> {
    conversation_id: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct CreateConversationRequest<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct TitleUpdateRequest<'a> {
    title: &'a str,
}

#[derive(Deserialize)]
struct ConversationListResponse {
    conversations: Vec<Conversation>,
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_message(&self, conversation_id: &str, message: &str) -> Result<ChatReply> {
        const OPERATION: &str = "send message";
        debug!("POST /api/chat/message conversation_id={}", conversation_id);

        let response = self
            .client
            .post(self.url("/api/chat/message"))
            .json(&MessageRequest {
                conversation_id,
                message,
            })
            .send()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))?;

        if !response.status().is_success() {
            return Err(MurmurError::backend(OPERATION));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))
    }

    async fn create_conversation(&self, title: Option<&str>) -> Result<Conversation> {
        const OPERATION: &str = "create conversation";
        let title = title.unwrap_or("New Chat");
        debug!("POST /api/chat/new title={:?}", title);

        let response = self
            .client
            .post(self.url("/api/chat/new"))
            .json(&CreateConversationRequest { title })
            .send()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))?;

        if !response.status().is_success() {
            return Err(MurmurError::backend(OPERATION));
        }

        response
            .json::<Conversation>()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        const OPERATION: &str = "fetch conversations";
        debug!("GET /api/chat/conversations");

        let response = self
            .client
            .get(self.url("/api/chat/conversations"))
            .send()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))?;

        if !response.status().is_success() {
            return Err(MurmurError::backend(OPERATION));
        }

        let parsed = response
            .json::<ConversationListResponse>()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))?;

        Ok(parsed.conversations)
    }

    async fn conversation_history(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationWithMessages> {
        const OPERATION: &str = "fetch conversation history";
        debug!("GET /api/chat/conversations/{}", conversation_id);

        let response = self
            .client
            .get(self.url(&format!("/api/chat/conversations/{}", conversation_id)))
            .send()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))?;

        if !response.status().is_success() {
            return Err(MurmurError::backend(OPERATION));
        }

        response
            .json::<ConversationWithMessages>()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))
    }

    async fn delete_conversation(&self, conversation_id: &str) -> Result<()> {
        const OPERATION: &str = "delete conversation";
        debug!("DELETE /api/chat/conversations/{}", conversation_id);

        let response = self
            .client
            .delete(self.url(&format!("/api/chat/conversations/{}", conversation_id)))
            .send()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))?;

        if !response.status().is_success() {
            return Err(MurmurError::backend(OPERATION));
        }

        Ok(())
    }

    async fn update_title(&self, conversation_id: &str, title: &str) -> Result<()> {
        const OPERATION: &str = "update conversation title";
        debug!(
            "PUT /api/chat/conversations/{}/title title={:?}",
            conversation_id, title
        );

        let response = self
            .client
            .put(self.url(&format!("/api/chat/conversations/{}/title", conversation_id)))
            .json(&TitleUpdateRequest { title })
            .send()
            .await
            .map_err(|_| MurmurError::backend(OPERATION))?;

        if !response.status().is_success() {
            return Err(MurmurError::backend(OPERATION));
        }

        // Response body is ignored; the rename is best-effort for callers.
        Ok(())
    }
}
