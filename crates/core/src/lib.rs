//! # carewise core
//!
//! Domain types, traits, and error definitions for the carewise caregiver
//! assistant. This crate performs no network or file I/O — it defines the
//! domain model that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! The language-model endpoint is a trait here ([`ModelGateway`]); the concrete
//! HTTP implementation lives in `carewise-providers`. Everything else in this
//! crate is plain data:
//! - [`ConversationTurn`] / [`Conversation`] — the caller-owned turn log
//! - [`SubjectProfile`] / [`Stage`] — the care recipient being discussed
//! - [`Credential`] — injected explicitly into every gateway call

pub mod conversation;
pub mod error;
pub mod gateway;
pub mod subject;

// Re-export key types at crate root for ergonomics
pub use conversation::{Conversation, ConversationId, ConversationTurn, Role};
pub use error::{ConversationError, Error, GatewayError, ProfileError, Result};
pub use gateway::{Credential, GatewayRequest, ModelGateway};
pub use subject::{Stage, SubjectProfile};
