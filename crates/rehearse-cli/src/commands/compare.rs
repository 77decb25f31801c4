//! The `rehearse compare` command.

use std::path::PathBuf;

use anyhow::Result;

use rehearse_core::report::InterviewReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = InterviewReport::load_json(&baseline_path)?;
    let current = InterviewReport::load_json(&current_path)?;

    let progress = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", progress.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        _ => {
            // text format
            println!(
                "Overall: {} -> {} ({:+})",
                progress.baseline_score, progress.current_score, progress.delta
            );

            if !progress.same_questions {
                println!("Different question sets; per-question changes skipped.");
            }
            for q in progress.per_question.iter().filter(|q| q.delta != 0) {
                println!(
                    "  Question {}: {} -> {} ({:+})",
                    q.index + 1,
                    q.baseline_score,
                    q.current_score,
                    q.delta
                );
            }

            if !progress.resolved_improvements.is_empty() {
                println!("\nNo longer flagged:");
                for label in &progress.resolved_improvements {
                    println!("  {label}");
                }
            }
            if !progress.new_improvements.is_empty() {
                println!("\nNew focus areas:");
                for label in &progress.new_improvements {
                    println!("  {label}");
                }
            }
        }
    }

    if fail_on_regression && progress.has_regressed() {
        std::process::exit(1);
    }

    Ok(())
}
