//! Error types for the carewise domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] wraps them all.

use thiserror::Error;

/// The top-level error type for all carewise operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Gateway errors ---
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    // --- Subject profile errors ---
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    // --- Conversation errors ---
    #[error("Conversation error: {0}")]
    Conversation(#[from] ConversationError),

    // --- Caller-supplied input files ---
    #[error("Failed to load {path}: {reason}")]
    Input { path: String, reason: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the external text-generation endpoint.
///
/// None of these is ever shown to the end user for a normal question: the
/// assistant routes every variant to the fallback generator.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// No credential configured, or the endpoint rejected it.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network or protocol failure, including non-success HTTP status and timeouts.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The endpoint answered but the payload lacks a usable completion field.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    /// Only produced by strict parsing; lenient loading coerces to `moderate`.
    #[error("Invalid stage value: '{0}' (expected early, moderate, or advanced)")]
    InvalidStageValue(String),
}

#[derive(Debug, Clone, Error)]
pub enum ConversationError {
    #[error("Turn created at {turn} precedes the last recorded turn at {last}")]
    OutOfOrder { turn: String, last: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_displays_correctly() {
        let err = Error::Gateway(GatewayError::Transport("connection refused".into()));
        assert!(err.to_string().contains("Transport"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn stage_error_names_the_value() {
        let err = Error::Profile(ProfileError::InvalidStageValue("severe".into()));
        assert!(err.to_string().contains("severe"));
        assert!(err.to_string().contains("moderate"));
    }

    #[test]
    fn input_error_names_path_and_reason() {
        let err = Error::Input {
            path: "case/profile.toml".into(),
            reason: "missing field `age`".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load case/profile.toml: missing field `age`"
        );
    }

    #[test]
    fn conversation_error_converts() {
        let err: Error = ConversationError::OutOfOrder {
            turn: "a".into(),
            last: "b".into(),
        }
        .into();
        assert!(matches!(err, Error::Conversation(_)));
    }
}
