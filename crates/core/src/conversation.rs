//! Conversation turns and the caller-owned turn log.
//!
//! Turns are immutable once created and are appended in strict chronological
//! order. The assistant never stores turns itself: it reads a suffix of the
//! log (the recent window) at the moment a question is submitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConversationError;

/// Number of recent turns replayed into a new prompt unless configured otherwise.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The caregiver asking questions
    User,
    /// The assistant (model or fallback)
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Unique turn ID
    #[serde(default = "new_turn_id")]
    pub id: String,

    /// Who authored this turn
    pub role: Role,

    /// The text content
    pub content: String,

    /// Creation time
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn new_turn_id() -> String {
    Uuid::new_v4().to_string()
}

impl ConversationTurn {
    /// Create a turn stamped with an explicit time.
    pub fn at(role: Role, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_turn_id(),
            role,
            content: content.into(),
            created_at,
        }
    }

    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::at(Role::User, content, Utc::now())
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::at(Role::Assistant, content, Utc::now())
    }
}

/// The chronological suffix of `turns` holding at most `size` entries.
///
/// Never samples or reorders: the returned slice is the tail of the input.
pub fn recent_window(turns: &[ConversationTurn], size: usize) -> &[ConversationTurn] {
    &turns[turns.len().saturating_sub(size)..]
}

/// An append-only, ordered log of turns for one session or one subject.
///
/// Deserialization goes through the same order check as [`Conversation::push`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ConversationRecord")]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// The subject (care recipient) this conversation is about, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    turns: Vec<ConversationTurn>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last turn was added
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            subject_id: None,
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a conversation scoped to one subject.
    pub fn for_subject(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
            ..Self::new()
        }
    }

    /// Rebuild a conversation from previously recorded turns, checking order.
    pub fn from_turns(turns: Vec<ConversationTurn>) -> Result<Self, ConversationError> {
        let mut conv = Self::new();
        for turn in turns {
            conv.push(turn)?;
        }
        Ok(conv)
    }

    /// Append a turn. Rejects turns created before the last recorded one.
    pub fn push(&mut self, turn: ConversationTurn) -> Result<(), ConversationError> {
        if let Some(last) = self.turns.last() {
            if turn.created_at < last.created_at {
                return Err(ConversationError::OutOfOrder {
                    turn: turn.created_at.to_rfc3339(),
                    last: last.created_at.to_rfc3339(),
                });
            }
        }
        self.updated_at = Utc::now();
        self.turns.push(turn);
        Ok(())
    }

    /// Append a question and the answer it produced.
    ///
    /// Both turns are stamped no earlier than the last recorded turn, so this
    /// never fails even if the wall clock steps backwards.
    pub fn record_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let floor = self.turns.last().map(|t| t.created_at);
        let stamp = |now: DateTime<Utc>| floor.map_or(now, |f| f.max(now));

        let asked = stamp(Utc::now());
        self.turns.push(ConversationTurn::at(Role::User, question, asked));
        let answered = asked.max(Utc::now());
        self.turns
            .push(ConversationTurn::at(Role::Assistant, answer, answered));
        self.updated_at = Utc::now();
    }

    /// All turns in chronological order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The most recent `size` turns in chronological order.
    pub fn recent(&self, size: usize) -> &[ConversationTurn] {
        recent_window(&self.turns, size)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of [`Conversation`], validated on the way in.
#[derive(Deserialize)]
struct ConversationRecord {
    #[serde(default)]
    id: ConversationId,
    #[serde(default)]
    subject_id: Option<String>,
    #[serde(default)]
    turns: Vec<ConversationTurn>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl TryFrom<ConversationRecord> for Conversation {
    type Error = ConversationError;

    fn try_from(record: ConversationRecord) -> Result<Self, Self::Error> {
        let mut conv = Self::from_turns(record.turns)?;
        conv.id = record.id;
        conv.subject_id = record.subject_id;
        conv.created_at = record.created_at;
        conv.updated_at = record.updated_at;
        Ok(conv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn numbered(count: usize) -> Vec<ConversationTurn> {
        let start = Utc::now();
        (0..count)
            .map(|i| {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                ConversationTurn::at(role, format!("turn {i}"), start + Duration::seconds(i as i64))
            })
            .collect()
    }

    #[test]
    fn role_renders_lowercase() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn window_is_chronological_suffix() {
        let turns = numbered(10);
        let window = recent_window(&turns, 6);
        let contents: Vec<_> = window.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["turn 4", "turn 5", "turn 6", "turn 7", "turn 8", "turn 9"]
        );
    }

    #[test]
    fn window_larger_than_log_returns_everything() {
        let turns = numbered(3);
        assert_eq!(recent_window(&turns, DEFAULT_HISTORY_WINDOW).len(), 3);
        assert!(recent_window(&[], 6).is_empty());
    }

    #[test]
    fn push_rejects_out_of_order_turn() {
        let mut conv = Conversation::new();
        let now = Utc::now();
        conv.push(ConversationTurn::at(Role::User, "later", now)).unwrap();

        let earlier = ConversationTurn::at(Role::Assistant, "earlier", now - Duration::seconds(5));
        let err = conv.push(earlier).unwrap_err();
        assert!(matches!(err, ConversationError::OutOfOrder { .. }));
        assert_eq!(conv.len(), 1);
    }

    #[test]
    fn record_exchange_appends_user_then_assistant() {
        let mut conv = Conversation::for_subject("patient-1");
        conv.record_exchange("How do I help with bathing?", "Try a warm, calm routine.");

        let turns = conv.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].role, Role::Assistant);
        assert!(turns[0].created_at <= turns[1].created_at);
        assert_eq!(conv.subject_id.as_deref(), Some("patient-1"));
    }

    #[test]
    fn from_turns_validates_order() {
        let mut turns = numbered(4);
        assert!(Conversation::from_turns(turns.clone()).is_ok());

        turns.swap(1, 2);
        assert!(Conversation::from_turns(turns).is_err());
    }

    #[test]
    fn turn_deserializes_with_missing_id_and_time() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role":"assistant","content":"hello"}"#).unwrap();
        assert_eq!(turn.role, Role::Assistant);
        assert!(!turn.id.is_empty());
    }

    #[test]
    fn deserializing_checks_turn_order() {
        let in_order = r#"{
            "id": "c1",
            "turns": [
                {"role":"user","content":"hi","created_at":"2026-01-01T00:00:00Z"},
                {"role":"assistant","content":"hello","created_at":"2026-01-01T00:00:05Z"}
            ],
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:05Z"
        }"#;
        let conv: Conversation = serde_json::from_str(in_order).unwrap();
        assert_eq!(conv.id.to_string(), "c1");
        assert_eq!(conv.len(), 2);

        let out_of_order = r#"{
            "id": "c2",
            "turns": [
                {"role":"user","content":"second","created_at":"2026-01-02T00:00:00Z"},
                {"role":"assistant","content":"first","created_at":"2026-01-01T00:00:00Z"}
            ]
        }"#;
        let err = serde_json::from_str::<Conversation>(out_of_order).unwrap_err();
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn serialized_conversation_loads_back() {
        let mut conv = Conversation::for_subject("p1");
        conv.record_exchange("q", "a");
        let json = serde_json::to_string(&conv).unwrap();
        let loaded: Conversation = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.turns(), conv.turns());
        assert_eq!(loaded.subject_id.as_deref(), Some("p1"));
    }
}
