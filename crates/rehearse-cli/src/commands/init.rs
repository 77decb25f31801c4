//! The `rehearse init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("rehearse.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("questions.toml"), SAMPLE_QUESTIONS)?;

    println!("\nNext steps:");
    println!("  1. Edit questions.toml to add your own roles and questions");
    println!("  2. Run: rehearse validate --questions questions.toml");
    println!("  3. Run: rehearse run --role \"Site Reliability Engineer\" --experience senior");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# rehearse configuration

default_role = "Software Engineer"
default_experience = "mid"
submit_latency_ms = 1500
question_bank = "questions.toml"
output_dir = "./rehearse-results"

# Dictation replays question-<n>.txt transcripts from a directory.
[capture]
type = "none"
# type = "transcripts"
# dir = "${HOME}/rehearse/transcripts"
# words_per_update = 3
# interval_ms = 250
"#;

const SAMPLE_QUESTIONS: &str = r#"# Questions for roles without a dedicated set.
default = [
    "Tell me about your background and experience in this field.",
    "What are your technical strengths and areas you're looking to develop?",
    "Describe a challenging problem you solved in a previous role.",
    "How do you approach learning new technologies or methodologies?",
    "Where do you see yourself professionally in the next few years?",
]

[[roles]]
name = "Site Reliability Engineer"
questions = [
    "Walk me through how you would respond to a production outage.",
    "How do you decide what to alert on?",
    "Describe a postmortem you led and what changed afterwards.",
    "How do you balance reliability work against feature delivery?",
    "What does a good service level objective look like to you?",
]

[[roles]]
name = "QA Engineer"
questions = [
    "How do you decide what to automate and what to test manually?",
    "Describe a bug you found that others had missed.",
    "How do you test a feature with unclear requirements?",
    "What makes a test suite trustworthy?",
    "How do you work with developers when a release is at risk?",
]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn sample_questions_parse_cleanly() {
        let bank =
            rehearse_core::bank::parse_bank_str(SAMPLE_QUESTIONS, &PathBuf::from("questions.toml"))
                .unwrap();
        assert!(bank.has_role("Site Reliability Engineer"));
        assert!(rehearse_core::bank::validate_bank(&bank).is_empty());
    }

    #[test]
    fn sample_config_parses() {
        let config: rehearse_capture::RehearseConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.default_role, "Software Engineer");
        assert_eq!(config.capture, rehearse_capture::CaptureConfig::None);
    }
}
