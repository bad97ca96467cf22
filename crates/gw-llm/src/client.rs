use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::prompt::build_prompt;
use crate::retry::execute_with_retry;
use crate::types::ContextBlock;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build llm http client")
});

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for the chat-completion backend conditioning replies on retrieved
/// memories.
pub struct LlmClient {
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }

    /// Render `user_message` with `context_blocks` folded in, call the
    /// backend, and return the assistant's reply text.
    pub async fn chat(
        &self,
        system: &str,
        user_message: &str,
        context_blocks: &[ContextBlock],
    ) -> Result<String, LlmError> {
        if user_message.trim().is_empty() {
            return Err(LlmError::InvalidInput("user_message must not be empty".into()));
        }

        let (system_text, user_text) =
            build_prompt(system, user_message, context_blocks, self.config.token_budget);

        execute_with_retry(&self.config.retry, || {
            let system_text = system_text.clone();
            let user_text = user_text.clone();
            async move { self.call_once(&system_text, &user_text).await }
        })
        .await
    }

    async fn call_once(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user.to_string(),
                },
            ],
        };

        let response = HTTP_CLIENT
            .post(&self.config.api_url)
            .timeout(self.config.call_timeout)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::RemoteUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(LlmError::RemoteRejected(format!("llm backend returned {status}")));
        }
        if status.is_server_error() {
            return Err(LlmError::RemoteUnavailable(format!("llm backend returned {status}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::RemoteRejected(format!("malformed llm response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::RemoteRejected("llm response had no choices".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_empty_user_message() {
        let client = LlmClient::new(LlmConfig::default());
        let err = client.chat("system", "  ", &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidInput(_)));
    }
}
