// Chat completion client over an OpenAI-style HTTP API.
//
// One blocking POST per call, no streaming, no retries; the upstream reply
// text comes back verbatim. The client can be Disabled when no API key is
// configured, in which case every call reports the upstream-failure path.

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::chat::persona::ApiMessage;
use crate::config::Config;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Fixed apology used when the upstream responds without any reply text.
pub const REPLY_FALLBACK: &str = "Sorry, I couldn't come up with a reply.";

/// The seam the relay calls through. Tests substitute a scripted backend.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Request one completion for the given message list and return the
    /// reply text.
    async fn complete(&self, messages: &[ApiMessage]) -> anyhow::Result<String>;
}

// ---------------------------------------------------------------------------
// OpenAiClient
// ---------------------------------------------------------------------------

/// Low-level chat-completion client with fixed sampling parameters.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client with the given API key and the sampling parameters
    /// from config.
    pub fn new(api_key: String, config: &Config) -> Self {
        let base_url = config
            .chat
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: config.chat.model.clone(),
            max_tokens: config.chat.max_tokens,
            temperature: config.chat.temperature,
            base_url,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, messages: &[ApiMessage]) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to reach the completion API")?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "completion API returned an error status");
            bail!("completion API returned status {status}");
        }

        let payload: Value = response
            .json()
            .await
            .context("failed to parse the completion API response")?;
        debug!("completion API call succeeded");

        Ok(parse_reply_text(&payload).unwrap_or_else(|| REPLY_FALLBACK.to_string()))
    }
}

/// Extract the first choice's message content from a completion response.
///
/// Expected shape: `{ "choices": [ { "message": { "content": "..." } } ] }`
pub(crate) fn parse_reply_text(payload: &Value) -> Option<String> {
    let content = payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?;
    if content.is_empty() {
        return None;
    }
    Some(content.to_string())
}

// ---------------------------------------------------------------------------
// ChatClient wrapper
// ---------------------------------------------------------------------------

/// High-level wrapper that is either an active client or disabled.
pub enum ChatClient {
    /// The completion API is configured and ready.
    Active(OpenAiClient),
    /// No API key configured; every call fails as an upstream error.
    Disabled,
}

impl ChatClient {
    /// Build a `ChatClient` from the application config.
    ///
    /// Returns `Active` if an API key is present in credentials, otherwise
    /// returns `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        match &config.credentials.openai_api_key {
            Some(key) if !key.is_empty() => {
                ChatClient::Active(OpenAiClient::new(key.clone(), config))
            }
            _ => ChatClient::Disabled,
        }
    }
}

#[async_trait]
impl CompletionBackend for ChatClient {
    async fn complete(&self, messages: &[ApiMessage]) -> anyhow::Result<String> {
        match self {
            ChatClient::Active(client) => client.complete(messages).await,
            ChatClient::Disabled => bail!("completion API not configured"),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
