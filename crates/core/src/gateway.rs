//! Gateway trait — the abstraction over the external text-generation endpoint.
//!
//! A gateway sends one assembled prompt to a language model and returns the
//! raw completion text. The credential is passed into every call; gateways
//! never look up keys from ambient state.
//!
//! Implementations: OpenAI-compatible chat completions (`carewise-providers`),
//! plus test doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Reference sampling temperature for caregiver answers.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Reference upper bound on generated tokens per answer.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// An API credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for placing in an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// A single, non-streaming generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    /// The model to use (e.g., "gpt-4o-mini")
    pub model: String,

    /// System instruction framing the assistant's role
    pub system_instruction: String,

    /// The assembled prompt envelope
    pub prompt: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl GatewayRequest {
    /// A request with the reference temperature and token bound.
    pub fn new(
        model: impl Into<String>,
        system_instruction: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// The core gateway trait.
///
/// The assistant calls `generate()` at most once per question and treats any
/// error as a signal to fall back to the deterministic generator.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// A human-readable name for this gateway (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Whether a call is worth attempting with the given credential.
    ///
    /// Lets the caller skip the network round-trip (and its latency) entirely.
    fn has_access(&self, credential: Option<&Credential>) -> bool {
        credential.is_some_and(|c| !c.is_blank())
    }

    /// Send one prompt and return the generated text.
    async fn generate(
        &self,
        request: GatewayRequest,
        credential: &Credential,
    ) -> std::result::Result<String, GatewayError>;
}
