//! OpenAI-compatible chat-completion gateway.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, Groq, Together AI, and any
//! endpoint exposing `/chat/completions`.
//!
//! One non-streaming request per call: a system message plus the assembled
//! prompt as the user message. The completion is read from
//! `choices[0].message.content`.

use async_trait::async_trait;
use carewise_core::error::GatewayError;
use carewise_core::gateway::{Credential, GatewayRequest, ModelGateway};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// An OpenAI-compatible model gateway.
///
/// Holds no credential: the key arrives with every `generate()` call.
pub struct ChatCompletionGateway {
    name: String,
    base_url: String,
    requires_key: bool,
    client: reqwest::Client,
}

impl ChatCompletionGateway {
    /// Create a new gateway with a request timeout.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            requires_key: true,
            client,
        }
    }

    /// Create an OpenAI gateway (convenience constructor).
    pub fn openai(timeout: Duration) -> Self {
        Self::new("openai", "https://api.openai.com/v1", timeout)
    }

    /// Create an OpenRouter gateway (convenience constructor).
    pub fn openrouter(timeout: Duration) -> Self {
        Self::new("openrouter", "https://openrouter.ai/api/v1", timeout)
    }

    /// Create an Ollama gateway (convenience constructor).
    pub fn ollama(base_url: Option<&str>, timeout: Duration) -> Self {
        // Ollama doesn't need a real key
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            timeout,
        )
        .without_key()
    }

    /// Mark this endpoint as usable without a credential (local servers).
    pub fn without_key(mut self) -> Self {
        self.requires_key = false;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn to_api_messages(request: &GatewayRequest) -> Vec<ApiMessage> {
        vec![
            ApiMessage {
                role: "system".into(),
                content: Some(request.system_instruction.clone()),
            },
            ApiMessage {
                role: "user".into(),
                content: Some(request.prompt.clone()),
            },
        ]
    }

    /// Pull the completion text out of a response body.
    fn extract_completion(body: &str) -> Result<String, GatewayError> {
        let api_response: ApiResponse = serde_json::from_str(body).map_err(|e| {
            GatewayError::MalformedResponse(format!("Failed to parse response: {e}"))
        })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::MalformedResponse("No choices in response".into()))?;

        match choice.message.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err(GatewayError::MalformedResponse(
                "Completion content is empty".into(),
            )),
            None => Err(GatewayError::MalformedResponse(
                "Missing choices[0].message.content".into(),
            )),
        }
    }
}

#[async_trait]
impl ModelGateway for ChatCompletionGateway {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_access(&self, credential: Option<&Credential>) -> bool {
        !self.requires_key || credential.is_some_and(|c| !c.is_blank())
    }

    async fn generate(
        &self,
        request: GatewayRequest,
        credential: &Credential,
    ) -> Result<String, GatewayError> {
        if self.requires_key && credential.is_blank() {
            return Err(GatewayError::Auth("No API key configured".into()));
        }

        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request),
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false,
        });

        debug!(gateway = %self.name, model = %request.model, "Sending completion request");

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if !credential.is_blank() {
            builder = builder.header("Authorization", format!("Bearer {}", credential.expose()));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Transport(format!("Request timed out: {e}"))
            } else {
                GatewayError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(GatewayError::Auth(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if !(200..300).contains(&status) {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gateway returned error");
            return Err(GatewayError::Transport(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(format!("Failed to read response body: {e}")))?;

        Self::extract_completion(&text)
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}
