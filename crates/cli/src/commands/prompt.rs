//! `carewise prompt` — Print the prompt envelope without calling the gateway.

use std::path::Path;

use carewise_assistant::{PromptAssembler, PromptInput, classify};
use carewise_config::AppConfig;
use carewise_core::conversation::Conversation;

use super::inputs::{CaseContext, ContextArgs, load_history};

pub fn run(
    question: &str,
    args: &ContextArgs,
    history: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let context = CaseContext::load(args)?;
    let conversation = match history {
        Some(path) => load_history(path)?,
        None => Conversation::new(),
    };

    let classification = classify(question);
    let envelope = PromptAssembler::new(config.history_window).compose(&PromptInput {
        question,
        classification: &classification,
        subject: context.profile.as_ref(),
        case_text: context.case_text.as_deref(),
        case_file_digest: context.digest.as_deref(),
        history: conversation.turns(),
    });

    tracing::debug!(blocks = ?envelope.kinds(), "Composed prompt");
    println!("{envelope}");

    Ok(())
}
