//! Prompt assembly — folds situational context around the user's question.
//!
//! The envelope is built from up to six blocks in a fixed order:
//!
//! 1. **Instruction** — template for the top-ranked category (if any)
//! 2. **Question** — the user's text, verbatim, always present
//! 3. **Subject** — name, age, diagnosis, stage, profile narrative
//! 4. **Case narrative** — free-text case description from the caller
//! 5. **Case files** — digest of notes on uploaded case files
//! 6. **History** — the most recent turns, chronological
//!
//! Blocks are separated by a blank line. Absent inputs produce no block, so
//! a bare question with no context yields exactly the question.
//!
//! # Determinism
//!
//! Assembly is a pure function of its inputs: no I/O, no clock, no randomness.

use carewise_core::conversation::{ConversationTurn, DEFAULT_HISTORY_WINDOW, recent_window};
use carewise_core::subject::SubjectProfile;
use serde::Serialize;

use super::instructions::instruction_for;
use crate::classify::ClassificationResult;

const BLOCK_SEPARATOR: &str = "\n\n";

// ── Types ─────────────────────────────────────────────────────────────────

/// The kind of a block in the envelope, in the order blocks are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Instruction,
    Question,
    Subject,
    CaseNarrative,
    CaseFiles,
    History,
}

/// One rendered block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptBlock {
    pub kind: BlockKind,
    pub text: String,
}

/// All inputs for one prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub question: &'a str,
    pub classification: &'a ClassificationResult,
    pub subject: Option<&'a SubjectProfile>,
    /// Free-text case narrative supplied alongside the question
    pub case_text: Option<&'a str>,
    /// Caller-supplied concatenation of case-file notes
    pub case_file_digest: Option<&'a str>,
    /// The full turn log as of submission; only the recent window is used
    pub history: &'a [ConversationTurn],
}

impl<'a> PromptInput<'a> {
    /// A question with no context.
    pub fn bare(question: &'a str, classification: &'a ClassificationResult) -> Self {
        Self {
            question,
            classification,
            subject: None,
            case_text: None,
            case_file_digest: None,
            history: &[],
        }
    }
}

/// The composed text handed to the model gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptEnvelope {
    blocks: Vec<PromptBlock>,
    text: String,
}

impl PromptEnvelope {
    fn from_blocks(blocks: Vec<PromptBlock>) -> Self {
        let text = blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR);
        Self { blocks, text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn blocks(&self) -> &[PromptBlock] {
        &self.blocks
    }

    /// Block kinds in emission order.
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(|b| b.kind).collect()
    }

    pub fn block(&self, kind: BlockKind) -> Option<&PromptBlock> {
        self.blocks.iter().find(|b| b.kind == kind)
    }
}

impl std::fmt::Display for PromptEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

// ── Assembler ─────────────────────────────────────────────────────────────

/// The prompt assembler. Holds only the history window size.
#[derive(Debug, Clone, Copy)]
pub struct PromptAssembler {
    history_window: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl PromptAssembler {
    pub fn new(history_window: usize) -> Self {
        Self { history_window }
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Compose the envelope. Block order is fixed; see the module docs.
    pub fn compose(&self, input: &PromptInput<'_>) -> PromptEnvelope {
        let mut blocks = Vec::with_capacity(6);

        if let Some(text) = input
            .classification
            .top()
            .and_then(|top| instruction_for(&top.id))
        {
            blocks.push(PromptBlock {
                kind: BlockKind::Instruction,
                text: text.to_string(),
            });
        }

        blocks.push(PromptBlock {
            kind: BlockKind::Question,
            text: input.question.to_string(),
        });

        blocks.extend(context_blocks(
            input.subject,
            input.case_text,
            input.case_file_digest,
        ));

        let window = recent_window(input.history, self.history_window);
        if !window.is_empty() {
            blocks.push(PromptBlock {
                kind: BlockKind::History,
                text: render_history(window),
            });
        }

        PromptEnvelope::from_blocks(blocks)
    }
}

/// Compose with the default history window.
pub fn compose_prompt(
    question: &str,
    classification: &ClassificationResult,
    subject: Option<&SubjectProfile>,
    case_text: Option<&str>,
    case_file_digest: Option<&str>,
    history: &[ConversationTurn],
) -> PromptEnvelope {
    PromptAssembler::default().compose(&PromptInput {
        question,
        classification,
        subject,
        case_text,
        case_file_digest,
        history,
    })
}

/// The situational context (subject, narrative, case files) as one string.
///
/// Used as the `context` argument of the fallback generator so both answer
/// paths see the same information. `None` when there is no context at all.
pub fn render_fallback_context(
    subject: Option<&SubjectProfile>,
    case_text: Option<&str>,
    case_file_digest: Option<&str>,
) -> Option<String> {
    let blocks = context_blocks(subject, case_text, case_file_digest);
    if blocks.is_empty() {
        None
    } else {
        Some(
            blocks
                .iter()
                .map(|b| b.text.as_str())
                .collect::<Vec<_>>()
                .join(BLOCK_SEPARATOR),
        )
    }
}

// ── Block renderers ───────────────────────────────────────────────────────

fn context_blocks(
    subject: Option<&SubjectProfile>,
    case_text: Option<&str>,
    case_file_digest: Option<&str>,
) -> Vec<PromptBlock> {
    let mut blocks = Vec::new();

    if let Some(profile) = subject {
        blocks.push(PromptBlock {
            kind: BlockKind::Subject,
            text: render_subject(profile),
        });
    }

    let profile_narrative = subject.and_then(SubjectProfile::narrative);
    if let Some(text) = non_blank(case_text) {
        // Already emitted inside the subject block.
        if profile_narrative != Some(text) {
            blocks.push(PromptBlock {
                kind: BlockKind::CaseNarrative,
                text: format!("Case narrative:\n{text}"),
            });
        }
    }

    if let Some(digest) = non_blank(case_file_digest) {
        blocks.push(PromptBlock {
            kind: BlockKind::CaseFiles,
            text: format!("Case file notes (from uploaded documents):\n{digest}"),
        });
    }

    blocks
}

fn render_subject(profile: &SubjectProfile) -> String {
    let mut lines = vec![
        "Patient profile:".to_string(),
        format!("Name: {}", profile.name),
        format!("Age: {}", profile.age),
        format!("Diagnosis: {}", profile.diagnosis),
        format!("Stage: {}", profile.stage),
    ];
    if let Some(narrative) = profile.narrative() {
        lines.push(format!("Case narrative: {narrative}"));
    }
    lines.join("\n")
}

fn render_history(turns: &[ConversationTurn]) -> String {
    let mut out = String::from("Recent conversation:");
    for turn in turns {
        out.push('\n');
        out.push_str(turn.role.as_str());
        out.push_str(": ");
        out.push_str(&turn.content);
    }
    out
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────
