use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::providers::traits::ChatBackend;
use crate::providers::types::{ChatReply, ChatRequest, ProviderError};

/// Talks to the PAWNIN chat backend: `POST {base}/chat/` with
/// `{"message": ...}`, answered by `{"reply": ...}`.
pub struct PawninBackend {
    client: Client,
    endpoint: String,
}

impl PawninBackend {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: Self::chat_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn chat_endpoint(base_url: &Url) -> String {
        format!("{}/chat/", base_url.as_str().trim_end_matches('/'))
    }

    fn map_send_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::NetworkError(e.to_string())
        }
    }
}

#[async_trait]
impl ChatBackend for PawninBackend {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatReply, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.text().await.map_err(Self::map_send_error)?;
        serde_json::from_str::<ChatReply>(&body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}
