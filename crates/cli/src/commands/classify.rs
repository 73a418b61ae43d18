//! `carewise classify` — Rank the categories a question matches.

pub fn run(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = carewise_assistant::classify(question);

    if result.is_empty() {
        println!("No category matched; the question is used as-is.");
        return Ok(());
    }

    for (rank, m) in result.matches().iter().enumerate() {
        println!("  {}. {:<18} importance {}", rank + 1, m.id, m.context_importance);
    }

    Ok(())
}
