//! `carewise ask` — Interactive or single-question mode.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use carewise_assistant::{Answer, AnswerSource, CareAssistant};
use carewise_config::AppConfig;
use carewise_core::conversation::Conversation;
use carewise_core::error::GatewayError;
use carewise_core::gateway::{Credential, GatewayRequest, ModelGateway};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::inputs::{CaseContext, ContextArgs};

/// A gateway that never has access, so every answer comes from fallback.
struct OfflineGateway;

#[async_trait]
impl ModelGateway for OfflineGateway {
    fn name(&self) -> &str {
        "offline"
    }

    fn has_access(&self, _credential: Option<&Credential>) -> bool {
        false
    }

    async fn generate(
        &self,
        _request: GatewayRequest,
        _credential: &Credential,
    ) -> Result<String, GatewayError> {
        Err(GatewayError::Auth("offline mode".into()))
    }
}

pub async fn run(
    message: Option<String>,
    args: &ContextArgs,
    offline: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let context = CaseContext::load(args)?;

    let gateway: Arc<dyn ModelGateway> = if offline {
        Arc::new(OfflineGateway)
    } else {
        carewise_providers::build_from_config(&config)
    };

    let assistant = CareAssistant::new(gateway, &config.model, &config.system_prompt)
        .with_credential(config.credential())
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_history_window(config.history_window)
        .with_timeout(Duration::from_secs(config.timeout_secs));

    let mut conversation = match context.profile.as_ref() {
        Some(profile) => Conversation::for_subject(&profile.id),
        None => Conversation::new(),
    };

    if let Some(question) = message {
        // Single question mode
        eprint!("  Thinking...");
        let answer = assistant
            .answer(&context.request(&question, conversation.turns()))
            .await;
        eprint!("\r              \r");
        println!("{}", answer.text);
        print_source(&answer);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  carewise — Interactive Mode");
    println!();
    println!("  Gateway:   {}", assistant.gateway_name());
    println!("  Model:     {}", config.model);
    if !assistant.has_access() {
        println!("  Access:    none (answers come from built-in guidance)");
    }
    if let Some(profile) = &context.profile {
        println!("  Caring for: {} ({}, {} stage)", profile.name, profile.diagnosis, profile.stage);
    }
    println!();
    println!("  Type your question and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    use std::io::Write;
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }
        if question.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }

        eprint!("  ...");
        // The window is taken from the turns recorded so far.
        let answer = assistant
            .answer(&context.request(question, conversation.turns()))
            .await;
        eprint!("\r     \r");

        println!();
        for line in answer.text.lines() {
            println!("  Assistant > {line}");
        }
        print_source(&answer);
        println!();

        conversation.record_exchange(question, answer.text);

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    tracing::debug!(turns = conversation.len(), "Session ended");
    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

fn print_source(answer: &Answer) {
    if let AnswerSource::Fallback { reason, .. } = &answer.source {
        eprintln!("  [built-in guidance: {reason}]");
    }
}
