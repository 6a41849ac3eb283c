//! LLM interaction: build the chat request and call the completions endpoint.
//!
//! The relay only needs "system + user in, reply text out", so the seam is
//! the small [`CompletionProvider`] trait. [`OpenRouterClient`] is the
//! production implementation: one JSON POST in the OpenAI chat-completions
//! shape, bearer-authenticated, with a fixed timeout and no retries.
//!
//! All prompt text lives in [`crate::prompts`].

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::prompts::{statement_prompt, DEFAULT_SYSTEM_PROMPT};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Sends a chat-style prompt pair to a model and returns the reply text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Send a `system` instruction followed by a `user` message and return
    /// the assistant's reply verbatim.
    async fn complete(&self, system: &str, user: &str) -> Result<String, RelayError>;
}

/// Ask the model to turn `statement_text` into transaction JSON.
///
/// Returns the raw reply; decoding is the caller's job.
pub async fn parse_statement(
    provider: &Arc<dyn CompletionProvider>,
    statement_text: &str,
    config: &RelayConfig,
) -> Result<String, RelayError> {
    let system = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let user = statement_prompt(statement_text);

    let start = Instant::now();
    let reply = provider.complete(system, &user).await?;
    debug!(
        "{}: {} prompt chars, {} reply chars, {:?}",
        provider.name(),
        user.len(),
        reply.len(),
        start.elapsed()
    );
    Ok(reply)
}

// ── Wire format ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────

/// Client for an OpenAI-compatible chat-completions endpoint (OpenRouter by default).
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    referer: String,
    app_title: String,
    timeout_secs: u64,
}

impl OpenRouterClient {
    /// Build a client from the relay configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            url: config.api_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, RelayError> {
        let key = self.api_key.as_deref().ok_or(RelayError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        info!("Sending statement to {} ({})", self.url, self.model);
        let response = self
            .http
            .post(&self.url)
            .header(AUTHORIZATION, format!("Bearer {key}"))
            .header(CONTENT_TYPE, "application/json")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::from_reqwest(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RelayError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RelayError::MalformedResponse("no choices[0].message.content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_system_then_user() {
        let body = ChatRequest {
            model: "openrouter/free",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["model"], "openrouter/free");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "usr");
    }

    #[test]
    fn response_content_is_optional() {
        let r: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(r.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = RelayConfig::builder()
            .api_url("http://127.0.0.1:9/unreachable")
            .build()
            .unwrap();
        let client = OpenRouterClient::from_config(&config).unwrap();
        let err = client.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, RelayError::MissingApiKey));
    }

    struct Echo;

    #[async_trait]
    impl CompletionProvider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, system: &str, user: &str) -> Result<String, RelayError> {
            Ok(format!("{system}|{user}"))
        }
    }

    #[tokio::test]
    async fn parse_statement_uses_system_prompt_override() {
        let provider: Arc<dyn CompletionProvider> = Arc::new(Echo);
        let config = RelayConfig::builder()
            .system_prompt("CUSTOM")
            .build()
            .unwrap();
        let reply = parse_statement(&provider, "TEXT", &config).await.unwrap();
        assert!(reply.starts_with("CUSTOM|"));
        assert!(reply.contains("TEXT"));
    }

    #[tokio::test]
    async fn parse_statement_defaults_to_parser_prompt() {
        let provider: Arc<dyn CompletionProvider> = Arc::new(Echo);
        let reply = parse_statement(&provider, "TEXT", &RelayConfig::default())
            .await
            .unwrap();
        assert!(reply.starts_with(DEFAULT_SYSTEM_PROMPT));
    }
}
