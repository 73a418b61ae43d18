//! The reference nighttime-confusion scenario.
//!
//! Robert, 78, moderate Alzheimer's, gets up around 2 a.m., dresses and
//! anxiously insists on going to work at the factory he retired from fifteen
//! years ago. His wife Linda is the caregiver asking for help.
//!
//! Detection is deliberately narrow: the question must be about night,
//! confusion, or work, and the context must carry every marker of this case.

use std::sync::LazyLock;

use regex_lite::Regex;

static QUESTION_TOPIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)night|evening|confus|work|job|office").expect("valid built-in pattern")
});

static STRATEGY_REQUEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)strateg|approach").expect("valid built-in pattern"));

/// Every marker must be present in the context.
static CONTEXT_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\brobert\b",
        r"(?i)night|\b2\s*a\.?m\b",
        r"(?i)work|factory|job",
        r"(?i)anxi|get(s|ting)? (dressed|ready)|prepar",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid built-in pattern"))
    .collect()
});

/// Narrative of the reference case, as a caregiver would enter it.
pub fn canonical_narrative() -> &'static str {
    concat!(
        "Robert is 78 and has moderate Alzheimer's disease. Most nights he gets up ",
        "around 2 a.m., gets dressed, and anxiously insists he has to get ready for ",
        "work at the factory, although he retired 15 years ago. His wife Linda is his ",
        "primary caregiver."
    )
}

pub(crate) fn question_matches(question: &str) -> bool {
    QUESTION_TOPIC.is_match(question)
}

pub(crate) fn asks_for_strategy(question: &str) -> bool {
    STRATEGY_REQUEST.is_match(question)
}

pub(crate) fn context_matches(context: &str) -> bool {
    CONTEXT_MARKERS.iter().all(|re| re.is_match(context))
}

pub(crate) const STRATEGY_COMPARISON: &str = "\
Here are three approaches for Robert's nighttime confusion about going to work, \
and how they compare:

1. Validation and redirection (Recommended)
   Acknowledge the feeling behind the behavior instead of the facts. Robert is \
worried about being responsible and on time. Tell him how much his work has \
always mattered, then gently move him toward something calming: a warm drink, \
sitting together, or talking about the factory.

2. Environmental cues (Recommended)
   Make night look and feel like night. Keep lighting low, put work clothes and \
shoes out of sight, and place a simple sign or clock by the bed that reads \
\"Night time. Time to sleep.\" A steady evening routine reduces the triggers \
that start the episode.

3. Reality orientation (Not recommended)
   Repeatedly correcting him (\"You retired 15 years ago\") tends to increase \
distress. He may experience the news as new and upsetting every time, and it \
can escalate anxiety or lead to arguments at 2 a.m.

For most nights, combine the first two: validate the feeling in the moment and \
adjust the environment so the episode is less likely to start. If the pattern \
worsens or comes with new symptoms, mention it to his doctor.";

pub(crate) const WORKED_EXAMPLE: &str = "\
When Robert gets up and starts getting ready for work, you might say:

\"Robert, you've always been such a dependable worker. The factory is closed \
tonight, so there's nothing you need to do right now. Come sit with me and have \
something warm to drink, and tell me about the people you worked with.\"

Why this helps: it respects his sense of duty instead of contradicting it, gives \
him a clear reason to stop without arguing, and redirects him to a calm, \
familiar topic. Keep your voice low and slow, and avoid turning on bright lights.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_narrative_carries_every_marker() {
        assert!(context_matches(canonical_narrative()));
    }

    #[test]
    fn partial_context_does_not_match() {
        // Right person, wrong behavior.
        assert!(!context_matches("Robert enjoys gardening in the afternoon."));
        // Right behavior, different person.
        assert!(!context_matches(
            "Frank gets up at night, dresses, and anxiously says he must go to work."
        ));
    }

    #[test]
    fn question_topics() {
        assert!(question_matches("He's confused at NIGHT"));
        assert!(question_matches("He wants to go to his old job"));
        assert!(!question_matches("What should we have for lunch?"));
    }

    #[test]
    fn strategy_request() {
        assert!(asks_for_strategy("What approach should I take?"));
        assert!(asks_for_strategy("Any strategies for this?"));
        assert!(!asks_for_strategy("What do I say to him?"));
    }
}
