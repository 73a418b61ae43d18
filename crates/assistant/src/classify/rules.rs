//! The built-in category table.
//!
//! Declaration order matters: it is the tie-break when two categories share
//! a context importance.

use std::sync::LazyLock;

use super::{Category, CategoryRuleSet};

pub const MEDICAL: &str = "medical";
pub const MEMORY: &str = "memory";
pub const EMOTIONAL: &str = "emotional";
pub const DAILY_CARE: &str = "daily_care";
pub const SAFETY: &str = "safety";
pub const GENERAL_KNOWLEDGE: &str = "general_knowledge";
pub const CURRENT_EVENTS: &str = "current_events";
pub const DAILY_LIFE: &str = "daily_life";

/// (id, pattern groups, context importance)
const BUILTIN_TABLE: &[(&str, &[&str], u8)] = &[
    (
        MEDICAL,
        &[
            r"medic(ation|ine)|drug|pill|dose|dosage|prescri",
            r"doctor|physician|neurolog|nurse|clinic|hospital",
            r"symptom|side effect|diagnos|treatment",
        ],
        9,
    ),
    (
        MEMORY,
        &[
            r"memory|forget|forgot|remember|recall",
            r"confus|disorient|repeat(s|ing)? (the same|herself|himself|questions)",
        ],
        8,
    ),
    (
        EMOTIONAL,
        &[
            r"anxi|agitat|upset|angry|anger|aggress|frustrat",
            r"sad|depress|lonel|cry|crying|tears|mood|grief|guilt|stress",
        ],
        7,
    ),
    (
        DAILY_CARE,
        &[
            r"bath|shower|dress|groom|toilet|incontinen|hygien",
            r"eat|meal|food|drink|sleep|bedtime|routine",
        ],
        8,
    ),
    (
        SAFETY,
        &[
            r"wander|fall|fell|injur|danger|unsafe|emergency",
            r"lock|stove|driv|kitchen|fire|lost",
        ],
        10,
    ),
    (
        GENERAL_KNOWLEDGE,
        &[
            r"what is|what are|what does|explain|define|how does",
            r"research|studies|study|cause|stages of",
        ],
        3,
    ),
    (
        CURRENT_EVENTS,
        &[
            r"news|latest|recent|this week|this year",
            r"new (treatment|drug|medication|trial)|breakthrough|approved",
        ],
        2,
    ),
    (
        DAILY_LIFE,
        &[
            r"activit|hobb|music|walk|exercise|garden|visit",
            r"weekend|holiday|family|friend|grandchild",
        ],
        5,
    ),
];

static BUILTIN: LazyLock<CategoryRuleSet> = LazyLock::new(|| {
    let categories = BUILTIN_TABLE
        .iter()
        .map(|(id, patterns, importance)| {
            Category::new(*id, patterns, *importance).expect("valid built-in category")
        })
        .collect();
    CategoryRuleSet::new(categories)
});

/// The process-wide built-in rule set.
pub fn builtin() -> &'static CategoryRuleSet {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_category_compiles() {
        let set = builtin();
        assert_eq!(set.categories().len(), BUILTIN_TABLE.len());
        for category in set.categories() {
            assert!((1..=10).contains(&category.context_importance()));
            assert!((2..=3).contains(&category.pattern_count()), "{}", category.id());
        }
    }

    #[test]
    fn builtin_ids_are_unique() {
        let mut ids: Vec<_> = BUILTIN_TABLE.iter().map(|(id, _, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), BUILTIN_TABLE.len());
    }
}
