//! Per-category instruction templates prepended to the question.

use crate::classify::rules::*;

/// The instruction for a category id, or `None` for ids without a template.
pub fn instruction_for(category_id: &str) -> Option<&'static str> {
    let text = match category_id {
        MEDICAL => concat!(
            "Frame your answer as general health information in plain language. ",
            "State explicitly that it is not medical advice and that diagnosis, ",
            "medication, and treatment decisions belong to the person's clinician."
        ),
        MEMORY => concat!(
            "Use concrete, simple phrasing with specific examples of what to say ",
            "or do. Avoid abstract explanations."
        ),
        EMOTIONAL => concat!(
            "Respond with empathy first. Acknowledge how the caregiver and the ",
            "person may be feeling before offering practical suggestions."
        ),
        DAILY_CARE => concat!(
            "Give practical, step-by-step guidance for the care routine, adapted ",
            "to the person's current abilities and preserving their dignity."
        ),
        SAFETY => concat!(
            "Prioritize safety. Give clear, actionable steps with no ambiguity, ",
            "starting with what to do right now, and say when to call emergency services."
        ),
        GENERAL_KNOWLEDGE => concat!(
            "Explain the topic accurately and accessibly, and relate it to ",
            "day-to-day caregiving where relevant."
        ),
        CURRENT_EVENTS => concat!(
            "Note that your knowledge may not include the latest developments and ",
            "suggest checking reputable, up-to-date sources or the care team."
        ),
        DAILY_LIFE => concat!(
            "Suggest meaningful, achievable activities that fit the person's ",
            "interests, abilities, and stage."
        ),
        _ => return None,
    };
    Some(text)
}
