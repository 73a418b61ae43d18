//! Loading caller-supplied context from files: subject profile, case
//! narrative, case-file notes, and prior turns.

use std::path::{Path, PathBuf};

use carewise_assistant::{AnswerRequest, CaseFileNote, digest_case_files};
use carewise_core::conversation::{Conversation, ConversationTurn};
use carewise_core::subject::SubjectProfile;
use carewise_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Context flags shared by `prompt` and `ask`.
#[derive(Debug, Default, clap::Args)]
pub struct ContextArgs {
    /// Subject profile (TOML or JSON)
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Plain-text case narrative
    #[arg(long = "case")]
    pub case_text: Option<PathBuf>,

    /// Case-file notes manifest (TOML or JSON, `[[files]]` with name and notes); repeatable
    #[arg(long)]
    pub notes: Vec<PathBuf>,
}

/// Everything loaded from [`ContextArgs`].
#[derive(Debug, Default)]
pub struct CaseContext {
    pub profile: Option<SubjectProfile>,
    pub case_text: Option<String>,
    pub digest: Option<String>,
}

impl CaseContext {
    pub fn load(args: &ContextArgs) -> Result<Self> {
        let profile = args.profile.as_deref().map(load_profile).transpose()?;

        let case_text = match args.case_text.as_deref() {
            Some(path) => Some(read(path)?),
            None => None,
        };

        let mut files = Vec::new();
        for path in &args.notes {
            files.extend(load_case_files(path)?);
        }

        Ok(Self {
            profile,
            case_text,
            digest: digest_case_files(&files),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_none() && self.case_text.is_none() && self.digest.is_none()
    }

    /// An answer request over this context and the given turns.
    pub fn request<'a>(
        &'a self,
        question: &'a str,
        history: &'a [ConversationTurn],
    ) -> AnswerRequest<'a> {
        AnswerRequest {
            question,
            subject: self.profile.as_ref(),
            case_text: self.case_text.as_deref(),
            case_file_digest: self.digest.as_deref(),
            history,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CaseFileManifest {
    #[serde(default)]
    files: Vec<CaseFileNote>,
}

pub fn load_profile(path: &Path) -> Result<SubjectProfile> {
    parse(path)
}

pub fn load_case_files(path: &Path) -> Result<Vec<CaseFileNote>> {
    let manifest: CaseFileManifest = parse(path)?;
    Ok(manifest.files)
}

/// A JSON array of turns, checked for chronological order.
pub fn load_history(path: &Path) -> Result<Conversation> {
    let turns: Vec<ConversationTurn> = serde_json::from_str(&read(path)?)?;
    Ok(Conversation::from_turns(turns)?)
}

/// Parse JSON or TOML by extension.
fn parse<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read(path)?;
    if is_json(path) {
        serde_json::from_str(&content).map_err(|e| input_error(path, e))
    } else {
        toml::from_str(&content).map_err(|e| input_error(path, e))
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| input_error(path, e))
}

fn input_error(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::Input {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
