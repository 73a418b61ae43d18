//! Model gateway implementations for carewise.
//!
//! All gateways implement the `carewise_core::ModelGateway` trait.
//! The router builds the configured gateway from `AppConfig`.

pub mod openai_compat;
pub mod router;

pub use openai_compat::ChatCompletionGateway;
pub use router::build_from_config;
