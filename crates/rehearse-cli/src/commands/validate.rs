//! The `rehearse validate` command.

use std::path::PathBuf;

use anyhow::Result;

use rehearse_core::bank::{load_bank, validate_bank};

pub fn execute(questions: PathBuf) -> Result<()> {
    let bank = load_bank(&questions)?;

    println!(
        "Question bank: {} ({} roles, {} default questions)",
        questions.display(),
        bank.roles().len(),
        bank.default_questions().len()
    );

    let warnings = validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .role
            .as_ref()
            .map(|role| format!("  [{role}]"))
            .unwrap_or_else(|| "  [default]".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
