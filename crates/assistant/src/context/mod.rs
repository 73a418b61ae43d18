//! Context assembly: instruction templates, case-file digests, and the
//! prompt envelope.

pub mod assembler;
pub mod digest;
pub mod instructions;

pub use assembler::{
    BlockKind, PromptAssembler, PromptBlock, PromptEnvelope, PromptInput, compose_prompt,
    render_fallback_context,
};
pub use digest::{CaseFileNote, digest_case_files};
pub use instructions::instruction_for;
