//! # carewise-assistant
//!
//! The question-answering core: classify the question, fold the caregiving
//! context around it, ask the model gateway once, and fall back to a
//! deterministic answer when the gateway is unavailable or fails.
//!
//! Classification, assembly, and fallback are pure functions over fixed
//! tables. Only [`CareAssistant::answer`] suspends, and only on the gateway call.

pub mod classify;
pub mod context;
pub mod fallback;
pub mod responder;

pub use classify::{
    Category, CategoryMatch, CategoryRuleSet, ClassificationResult, RuleSetError, classify,
};
pub use context::{
    BlockKind, CaseFileNote, PromptAssembler, PromptEnvelope, PromptInput, compose_prompt,
    digest_case_files, render_fallback_context,
};
pub use fallback::{FallbackBranch, canonical_narrative, fallback, select_branch};
pub use responder::{Answer, AnswerRequest, AnswerSource, CareAssistant, FallbackReason};
