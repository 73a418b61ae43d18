//! `carewise demo` — The reference nighttime-confusion scenario, answered offline.

use carewise_assistant::{canonical_narrative, render_fallback_context, select_branch};
use carewise_core::subject::{Stage, SubjectProfile};

const STRATEGY_QUESTION: &str = "What approach should I take with nighttime confusion about work?";
const EXAMPLE_QUESTION: &str =
    "Robert is up again at night getting ready for work. What should I say to him?";

pub fn run(strategy: bool) {
    let robert = SubjectProfile::new("robert", "Robert", 78, "Alzheimer's disease", Stage::Moderate)
        .with_case_narrative(canonical_narrative());
    let question = if strategy { STRATEGY_QUESTION } else { EXAMPLE_QUESTION };

    let context = render_fallback_context(Some(&robert), None, None);
    let branch = select_branch(question, context.as_deref());

    println!("Case");
    println!("----");
    println!("{}\n", canonical_narrative());
    println!("Linda asks: {question}\n");
    println!("Answer ({branch})");
    println!("------");
    println!("{}", branch.text());
}
