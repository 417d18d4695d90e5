use async_trait::async_trait;

use super::types::{ChatReply, ChatRequest, ProviderError};

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one user utterance and wait for the assistant's reply.
    async fn send_message(&self, request: ChatRequest) -> Result<ChatReply, ProviderError>;
}
