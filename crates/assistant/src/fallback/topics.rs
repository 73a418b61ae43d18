//! Domain-topic answers: medication safety and communication techniques.

use std::sync::LazyLock;

use regex_lite::Regex;

static DIAGNOSIS_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)dementia|alzheimer|cognitive|memory loss|parkinson|lewy")
        .expect("valid built-in pattern")
});

static MEDICATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)medic(ation|ine)|pill|drug|dose|dosage|prescri").expect("valid built-in pattern")
});

static COMMUNICATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)communicat|talk|speak|convers|what (do|should) i say|respond to")
        .expect("valid built-in pattern")
});

pub(crate) fn references_domain(text: &str) -> bool {
    DIAGNOSIS_DOMAIN.is_match(text)
}

pub(crate) fn mentions_medication(text: &str) -> bool {
    MEDICATION.is_match(text)
}

pub(crate) fn mentions_communication(text: &str) -> bool {
    COMMUNICATION.is_match(text)
}

pub(crate) const MEDICATION_SAFETY: &str = "\
I don't have the specific prescription details for this person, so I can only \
offer general medication-safety guidance. This is not medical advice.

- Give medications exactly as prescribed. Do not change the dosage, skip doses, \
or stop a medication without talking to the prescribing clinician.
- Use a weekly pill organizer or blister packs and keep a simple log of what was \
taken and when.
- Watch for side effects such as increased confusion, drowsiness, dizziness, \
falls, or changes in appetite or mood, and write down when they happen.
- Bring a complete list of medications, including over-the-counter products and \
supplements, to every appointment.
- If swallowing is difficult, ask the pharmacist before crushing or splitting \
any tablet.
- Consult the doctor or pharmacist before making any change, and call emergency \
services if you suspect an overdose or a severe reaction.";

pub(crate) const COMMUNICATION_TECHNIQUES: &str = "\
Communication techniques that often help:

1. Approach from the front and say their name before you start talking.
2. Keep sentences short and ask one question at a time.
3. Offer simple choices instead of open questions (\"tea or juice?\").
4. Speak slowly and calmly, and give extra time to respond.
5. Use gestures, pictures, or objects to support your words.
6. Respond to the feeling behind the words rather than correcting facts.
7. Avoid arguing or saying \"don't you remember?\".
8. Reduce background noise and distractions before important conversations.
9. Keep eye contact at their level and use a warm, reassuring tone.
10. If things become tense, pause, step away briefly, and try again later.";

pub(crate) const DEFAULT_ANSWER: &str = "\
I can help with everyday caregiving questions: understanding symptoms and \
changes in behavior, daily care routines, safety at home, communication, \
emotional support for you and the person you care for, and planning meaningful \
activities.

The more I know about the situation, the more specific I can be. Tell me about \
the person's diagnosis and stage, what is happening, when it tends to happen, and \
what you have already tried.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_keywords() {
        assert!(references_domain("early-stage Alzheimer's"));
        assert!(references_domain("Lewy body dementia"));
        assert!(!references_domain("a sprained ankle"));
    }

    #[test]
    fn medication_answer_never_names_a_dose() {
        let mg = Regex::new(r"\d+\s*mg").unwrap();
        assert!(!mg.is_match(MEDICATION_SAFETY));
        assert!(MEDICATION_SAFETY.contains("not medical advice"));
        assert!(MEDICATION_SAFETY.contains("specific prescription details"));
    }

    #[test]
    fn communication_list_has_ten_items() {
        let items = COMMUNICATION_TECHNIQUES
            .lines()
            .filter(|l| l.split_once(". ").is_some_and(|(n, _)| n.parse::<u8>().is_ok()))
            .count();
        assert_eq!(items, 10);
    }
}
