//! Rule-based question classification.
//!
//! Each [`Category`] owns a few case-insensitive pattern groups and a context
//! importance in `[1, 10]`. A category matches when any of its groups matches
//! anywhere in the question. Matches are ranked by importance, highest first;
//! ties keep declaration order.
//!
//! Categories overlap on purpose ("medication" is both medical and safety
//! adjacent). The result is a ranking signal for prompt framing, not a router.

pub mod rules;

use regex_lite::Regex;
use serde::Serialize;
use tracing::debug;

/// Errors building a custom rule set.
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("Invalid pattern for category '{category}': {reason}")]
    InvalidPattern { category: String, reason: String },

    #[error("Context importance for '{category}' must be in 1..=10, got {value}")]
    ImportanceOutOfRange { category: String, value: u8 },
}

/// A labeled bucket of pattern rules.
#[derive(Debug, Clone)]
pub struct Category {
    id: String,
    patterns: Vec<Regex>,
    context_importance: u8,
}

impl Category {
    /// Compile a category. Patterns are matched case-insensitively.
    pub fn new(
        id: impl Into<String>,
        patterns: &[&str],
        context_importance: u8,
    ) -> Result<Self, RuleSetError> {
        let id = id.into();
        if !(1..=10).contains(&context_importance) {
            return Err(RuleSetError::ImportanceOutOfRange {
                category: id,
                value: context_importance,
            });
        }

        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(&format!("(?i){p}")).map_err(|e| RuleSetError::InvalidPattern {
                    category: id.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id,
            patterns,
            context_importance,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn context_importance(&self) -> u8 {
        self.context_importance
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// True if any pattern group matches anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// One matched category in a [`ClassificationResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatch {
    pub id: String,
    pub context_importance: u8,
}

/// Matched categories, highest context importance first.
///
/// Empty is a valid result: the question is used as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    matches: Vec<CategoryMatch>,
}

impl ClassificationResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The top-ranked category, if any matched.
    pub fn top(&self) -> Option<&CategoryMatch> {
        self.matches.first()
    }

    pub fn matches(&self) -> &[CategoryMatch] {
        &self.matches
    }

    pub fn ids(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.matches.iter().any(|m| m.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// An ordered, immutable table of categories.
#[derive(Debug, Clone)]
pub struct CategoryRuleSet {
    categories: Vec<Category>,
}

impl CategoryRuleSet {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The built-in caregiving table.
    pub fn builtin() -> &'static Self {
        rules::builtin()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Classify a question against every category.
    pub fn classify(&self, question: &str) -> ClassificationResult {
        let mut matches: Vec<CategoryMatch> = self
            .categories
            .iter()
            .filter(|c| c.matches(question))
            .map(|c| CategoryMatch {
                id: c.id.clone(),
                context_importance: c.context_importance,
            })
            .collect();

        // Stable: equal importance keeps declaration order.
        matches.sort_by(|a, b| b.context_importance.cmp(&a.context_importance));

        debug!(
            categories = ?matches.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            "Classified question"
        );

        ClassificationResult { matches }
    }
}

/// Classify a question with the built-in rule set.
pub fn classify(question: &str) -> ClassificationResult {
    CategoryRuleSet::builtin().classify(question)
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[test]
    fn no_match_is_empty() {
        let result = classify("Hello there");
        assert!(result.is_empty());
        assert!(result.top().is_none());
    }

    #[test]
    fn empty_question_is_empty() {
        assert!(classify("").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_and_unanchored() {
        let result = classify("Is it OK to change her MEDICATION schedule?");
        assert_eq!(result.top().map(|m| m.id.as_str()), Some(MEDICAL));

        // Substring match, no word boundary required.
        assert!(classify("premedication").contains(MEDICAL));
    }

    #[test]
    fn results_sorted_by_importance() {
        // safety (10) > medical (9) > emotional (7)
        let result = classify("He gets agitated and wanders off after his medication");
        assert_eq!(result.ids(), vec![SAFETY, MEDICAL, EMOTIONAL]);
    }

    #[test]
    fn ties_keep_declaration_order() {
        // memory (8) is declared before daily_care (8)
        let result = classify("She forgets to eat lunch");
        assert_eq!(result.ids(), vec![MEMORY, DAILY_CARE]);

        let set = CategoryRuleSet::new(vec![
            Category::new("zeta", &["tea"], 4).unwrap(),
            Category::new("alpha", &["tea"], 4).unwrap(),
        ]);
        assert_eq!(set.classify("tea time").ids(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn classification_is_repeatable() {
        let q = "My mother is confused at night, anxious, and won't take her pills";
        let first = classify(q);
        for _ in 0..10 {
            assert_eq!(classify(q), first);
        }
    }

    #[test]
    fn any_pattern_group_is_enough() {
        // Only the second medical group ("doctor") matches.
        let result = classify("Should I call the doctor?");
        assert!(result.contains(MEDICAL));
    }

    #[test]
    fn importance_outside_range_rejected() {
        assert!(matches!(
            Category::new("x", &["a"], 0),
            Err(RuleSetError::ImportanceOutOfRange { .. })
        ));
        assert!(matches!(
            Category::new("x", &["a"], 11),
            Err(RuleSetError::ImportanceOutOfRange { .. })
        ));
    }

    #[test]
    fn invalid_pattern_rejected() {
        let err = Category::new("broken", &["(unclosed"], 5).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidPattern { ref category, .. } if category == "broken"));
    }
}
