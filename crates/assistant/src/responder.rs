//! The care assistant — one question in, one answer out.
//!
//! ```text
//! question ──► classify ──► compose envelope ──► has access? ──► gateway ──► Answer (model)
//!                                                   │               │
//!                                                   no        error / timeout / blank
//!                                                   ▼               ▼
//!                                            fallback(question, rendered context) ──► Answer (fallback)
//! ```
//!
//! At most one gateway call is made per question. `answer` never fails: every
//! gateway problem is logged and routed to the deterministic fallback.

use std::sync::Arc;
use std::time::Duration;

use carewise_core::conversation::ConversationTurn;
use carewise_core::error::GatewayError;
use carewise_core::gateway::{
    Credential, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GatewayRequest, ModelGateway,
};
use carewise_core::subject::SubjectProfile;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::CategoryRuleSet;
use crate::context::{PromptAssembler, PromptInput, render_fallback_context};
use crate::fallback::{FallbackBranch, select_branch};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Why the fallback generator answered instead of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No usable credential; the gateway was never called.
    NoAccess,
    Auth,
    Transport,
    MalformedResponse,
    Timeout,
    /// The gateway succeeded with blank text.
    EmptyCompletion,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAccess => "no_access",
            Self::Auth => "auth",
            Self::Transport => "transport",
            Self::MalformedResponse => "malformed_response",
            Self::Timeout => "timeout",
            Self::EmptyCompletion => "empty_completion",
        }
    }
}

impl From<&GatewayError> for FallbackReason {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::Auth(_) => Self::Auth,
            GatewayError::Transport(_) => Self::Transport,
            GatewayError::MalformedResponse(_) => Self::MalformedResponse,
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an answer came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerSource {
    Model { gateway: String },
    Fallback {
        reason: FallbackReason,
        branch: FallbackBranch,
    },
}

/// The answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
    /// Matched category ids, highest importance first
    pub categories: Vec<String>,
}

impl Answer {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, AnswerSource::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match &self.source {
            AnswerSource::Fallback { reason, .. } => Some(*reason),
            AnswerSource::Model { .. } => None,
        }
    }
}

/// One question plus its situational context, as of submission.
#[derive(Debug, Clone, Copy)]
pub struct AnswerRequest<'a> {
    pub question: &'a str,
    pub subject: Option<&'a SubjectProfile>,
    pub case_text: Option<&'a str>,
    pub case_file_digest: Option<&'a str>,
    pub history: &'a [ConversationTurn],
}

impl<'a> AnswerRequest<'a> {
    pub fn new(question: &'a str) -> Self {
        Self {
            question,
            subject: None,
            case_text: None,
            case_file_digest: None,
            history: &[],
        }
    }

    pub fn with_subject(mut self, subject: &'a SubjectProfile) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_case_text(mut self, text: &'a str) -> Self {
        self.case_text = Some(text);
        self
    }

    pub fn with_case_file_digest(mut self, digest: &'a str) -> Self {
        self.case_file_digest = Some(digest);
        self
    }

    pub fn with_history(mut self, history: &'a [ConversationTurn]) -> Self {
        self.history = history;
        self
    }
}

/// Orchestrates classification, prompt assembly, the gateway call, and fallback.
pub struct CareAssistant {
    gateway: Arc<dyn ModelGateway>,
    credential: Option<Credential>,
    rules: CategoryRuleSet,
    assembler: PromptAssembler,
    model: String,
    system_instruction: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl CareAssistant {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        model: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            credential: None,
            rules: CategoryRuleSet::builtin().clone(),
            assembler: PromptAssembler::default(),
            model: model.into(),
            system_instruction: system_instruction.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Inject the credential passed to every gateway call.
    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_rules(mut self, rules: CategoryRuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.assembler = PromptAssembler::new(window);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The capability query: would `answer` try the gateway at all?
    pub fn has_access(&self) -> bool {
        self.gateway.has_access(self.credential.as_ref())
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Answer one question.
    pub async fn answer(&self, request: &AnswerRequest<'_>) -> Answer {
        let classification = self.rules.classify(request.question);
        let categories = classification
            .matches()
            .iter()
            .map(|m| m.id.clone())
            .collect();

        let envelope = self.assembler.compose(&PromptInput {
            question: request.question,
            classification: &classification,
            subject: request.subject,
            case_text: request.case_text,
            case_file_digest: request.case_file_digest,
            history: request.history,
        });

        let reason = match self.call_gateway(envelope.into_string()).await {
            Ok(text) => {
                return Answer {
                    text,
                    source: AnswerSource::Model {
                        gateway: self.gateway.name().to_string(),
                    },
                    categories,
                };
            }
            Err(reason) => reason,
        };

        let context = render_fallback_context(
            request.subject,
            request.case_text,
            request.case_file_digest,
        );
        let branch = select_branch(request.question, context.as_deref());
        info!(reason = %reason, branch = %branch, "Answering from fallback");

        Answer {
            text: branch.text().to_string(),
            source: AnswerSource::Fallback { reason, branch },
            categories,
        }
    }

    async fn call_gateway(&self, prompt: String) -> Result<String, FallbackReason> {
        if !self.has_access() {
            info!(gateway = %self.gateway.name(), "No gateway access configured");
            return Err(FallbackReason::NoAccess);
        }

        let request = GatewayRequest {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..GatewayRequest::new(&self.model, &self.system_instruction, prompt)
        };
        // Keyless gateways still receive a credential argument.
        let blank = Credential::new(String::new());
        let credential = self.credential.as_ref().unwrap_or(&blank);

        debug!(
            gateway = %self.gateway.name(),
            model = %self.model,
            prompt_len = request.prompt.len(),
            "Calling model gateway"
        );

        match tokio::time::timeout(self.timeout, self.gateway.generate(request, credential)).await {
            Ok(Ok(text)) if text.trim().is_empty() => {
                warn!(gateway = %self.gateway.name(), "Gateway returned an empty completion");
                Err(FallbackReason::EmptyCompletion)
            }
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                warn!(gateway = %self.gateway.name(), error = %e, "Gateway call failed");
                Err(FallbackReason::from(&e))
            }
            Err(_) => {
                warn!(
                    gateway = %self.gateway.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Gateway call timed out"
                );
                Err(FallbackReason::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::canonical_narrative;
    use async_trait::async_trait;
    use carewise_core::subject::Stage;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ── Test gateways ──────────────────────────────────────────────────

    /// Records every request and replies with a fixed result.
    struct ScriptedGateway {
        reply: Result<String, GatewayError>,
        calls: AtomicUsize,
        last_request: Mutex<Option<GatewayRequest>>,
    }

    impl ScriptedGateway {
        fn replying(reply: Result<String, GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            request: GatewayRequest,
            _credential: &Credential,
        ) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            self.reply.clone()
        }
    }

    struct HangingGateway;

    #[async_trait]
    impl ModelGateway for HangingGateway {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn generate(
            &self,
            _request: GatewayRequest,
            _credential: &Credential,
        ) -> Result<String, GatewayError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".into())
        }
    }

    /// Needs no credential, like a local server.
    struct KeylessGateway;

    #[async_trait]
    impl ModelGateway for KeylessGateway {
        fn name(&self) -> &str {
            "keyless"
        }

        fn has_access(&self, _credential: Option<&Credential>) -> bool {
            true
        }

        async fn generate(
            &self,
            _request: GatewayRequest,
            credential: &Credential,
        ) -> Result<String, GatewayError> {
            assert!(credential.is_blank());
            Ok("local answer".into())
        }
    }

    fn assistant(gateway: Arc<dyn ModelGateway>) -> CareAssistant {
        CareAssistant::new(gateway, "test-model", "You are a caregiving assistant.")
            .with_credential(Some(Credential::new("sk-test")))
    }

    // ── Primary path ───────────────────────────────────────────────────

    #[tokio::test]
    async fn model_answer_is_returned() {
        let gateway = ScriptedGateway::replying(Ok("Try a calm bedtime routine.".into()));
        let answer = assistant(gateway.clone())
            .answer(&AnswerRequest::new("How can I help her sleep?"))
            .await;

        assert_eq!(answer.text, "Try a calm bedtime routine.");
        assert_eq!(
            answer.source,
            AnswerSource::Model {
                gateway: "scripted".into()
            }
        );
        assert_eq!(answer.categories, vec!["daily_care"]);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn request_carries_envelope_and_parameters() {
        let gateway = ScriptedGateway::replying(Ok("ok".into()));
        let subject = SubjectProfile::new("p1", "Margaret", 82, "Alzheimer's disease", Stage::Early);
        let history = vec![
            ConversationTurn::user("Earlier question"),
            ConversationTurn::assistant("Earlier answer"),
        ];

        assistant(gateway.clone())
            .with_temperature(0.2)
            .with_max_tokens(512)
            .answer(
                &AnswerRequest::new("She refuses her medication")
                    .with_subject(&subject)
                    .with_history(&history),
            )
            .await;

        let request = gateway.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "test-model");
        assert_eq!(request.system_instruction, "You are a caregiving assistant.");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_tokens, 512);
        assert!(request.prompt.contains("not medical advice"));
        assert!(request.prompt.contains("She refuses her medication"));
        assert!(request.prompt.contains("Name: Margaret"));
        assert!(request.prompt.contains("user: Earlier question"));
    }

    #[tokio::test]
    async fn keyless_gateway_is_called_without_credential() {
        let answer = CareAssistant::new(Arc::new(KeylessGateway), "m", "s")
            .answer(&AnswerRequest::new("Hello"))
            .await;
        assert_eq!(answer.text, "local answer");
        assert!(!answer.is_fallback());
    }

    // ── Fallback path ──────────────────────────────────────────────────

    #[tokio::test]
    async fn no_credential_skips_gateway() {
        let gateway = ScriptedGateway::replying(Ok("unused".into()));
        let assistant = CareAssistant::new(gateway.clone(), "m", "s");
        assert!(!assistant.has_access());

        let answer = assistant.answer(&AnswerRequest::new("Hello")).await;
        assert_eq!(answer.fallback_reason(), Some(FallbackReason::NoAccess));
        assert!(!answer.text.is_empty());
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn blank_credential_counts_as_no_access() {
        let gateway = ScriptedGateway::replying(Ok("unused".into()));
        let answer = CareAssistant::new(gateway.clone(), "m", "s")
            .with_credential(Some(Credential::new("  ")))
            .answer(&AnswerRequest::new("Hello"))
            .await;
        assert_eq!(answer.fallback_reason(), Some(FallbackReason::NoAccess));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn every_gateway_error_falls_back_after_one_call() {
        let cases = [
            (GatewayError::Auth("401".into()), FallbackReason::Auth),
            (GatewayError::Transport("refused".into()), FallbackReason::Transport),
            (
                GatewayError::MalformedResponse("no choices".into()),
                FallbackReason::MalformedResponse,
            ),
        ];

        for (error, expected) in cases {
            let gateway = ScriptedGateway::replying(Err(error));
            let answer = assistant(gateway.clone())
                .answer(&AnswerRequest::new("Any advice?"))
                .await;
            assert_eq!(answer.fallback_reason(), Some(expected));
            assert!(!answer.text.trim().is_empty());
            assert_eq!(gateway.calls(), 1);
        }
    }

    #[tokio::test]
    async fn blank_completion_falls_back() {
        let gateway = ScriptedGateway::replying(Ok("  \n".into()));
        let answer = assistant(gateway).answer(&AnswerRequest::new("Any advice?")).await;
        assert_eq!(answer.fallback_reason(), Some(FallbackReason::EmptyCompletion));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_falls_back() {
        let answer = assistant(Arc::new(HangingGateway))
            .with_timeout(Duration::from_secs(5))
            .answer(&AnswerRequest::new("Any advice?"))
            .await;
        assert_eq!(answer.fallback_reason(), Some(FallbackReason::Timeout));
    }

    #[tokio::test]
    async fn fallback_sees_the_same_context() {
        let gateway = ScriptedGateway::replying(Err(GatewayError::Transport("down".into())));
        let answer = assistant(gateway)
            .answer(
                &AnswerRequest::new("What approach should I take with nighttime confusion about work?")
                    .with_case_text(canonical_narrative()),
            )
            .await;

        assert_eq!(
            answer.source,
            AnswerSource::Fallback {
                reason: FallbackReason::Transport,
                branch: FallbackBranch::ScenarioStrategies,
            }
        );
        assert!(answer.text.contains("Reality orientation (Not recommended)"));
    }

    #[tokio::test]
    async fn categories_reported_on_fallback() {
        let gateway = ScriptedGateway::replying(Err(GatewayError::Transport("down".into())));
        let answer = assistant(gateway)
            .answer(&AnswerRequest::new("He wanders off after his medication"))
            .await;
        assert_eq!(answer.categories, vec!["safety", "medical"]);
    }
}
