//! The `rehearse score` command.

use anyhow::Result;

use rehearse_core::scoring::{AnswerScorer, HeuristicScorer};

pub fn execute(answer: String, json: bool) -> Result<()> {
    let assessment = HeuristicScorer.score(&answer);

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    println!("Score: {}/100", assessment.score);
    println!("{}", assessment.feedback);
    println!("\nStrengths:");
    for s in &assessment.strengths {
        println!("  - {s}");
    }
    println!("\nAreas to improve:");
    for i in &assessment.improvements {
        println!("  - {i}");
    }

    Ok(())
}
