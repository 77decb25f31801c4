//! The `rehearse run` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use rehearse_capture::config::load_config_from;
use rehearse_capture::{create_capture, CaptureConfig};
use rehearse_core::bank::load_bank;
use rehearse_core::error::SessionError;
use rehearse_core::model::{Assessment, ExperienceLevel, SessionMeta};
use rehearse_core::report::InterviewReport;
use rehearse_core::session::{Advance, InterviewSession, SessionSnapshot};

pub struct RunArgs {
    pub role: Option<String>,
    pub experience: Option<String>,
    pub answers: Option<PathBuf>,
    pub questions: Option<PathBuf>,
    pub transcripts: Option<PathBuf>,
    pub latency_ms: Option<u64>,
    pub output: Option<PathBuf>,
    pub format: String,
    pub config: Option<PathBuf>,
}

/// Answers file: a bare array, or an object with an `answers` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswersFile {
    List(Vec<String>),
    Object { answers: Vec<String> },
}

pub async fn execute(args: RunArgs) -> Result<()> {
    anyhow::ensure!(
        matches!(args.format.as_str(), "json" | "markdown" | "md" | "all"),
        "unknown format '{}': expected json, markdown, or all",
        args.format
    );

    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(ms) = args.latency_ms {
        config.submit_latency_ms = ms;
    }
    if let Some(dir) = &args.transcripts {
        config.capture = CaptureConfig::Transcripts {
            dir: dir.to_string_lossy().into_owned(),
            words_per_update: rehearse_capture::scripted::DEFAULT_WORDS_PER_UPDATE,
            interval_ms: rehearse_capture::scripted::DEFAULT_INTERVAL_MS,
        };
    }

    let bank = match &args.questions {
        Some(path) => load_bank(path)?,
        None => config.question_bank()?,
    };

    let role = args
        .role
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| config.default_role.clone());
    let experience = match &args.experience {
        Some(level) => level
            .parse::<ExperienceLevel>()
            .map_err(anyhow::Error::msg)?,
        None => config.default_experience,
    };

    tracing::debug!(%role, %experience, format = %args.format, "starting run");
    if !bank.has_role(&role) {
        eprintln!("No dedicated questions for '{role}', using the general set.");
    }

    let session = InterviewSession::new(
        bank.questions_for(&role).to_vec(),
        SessionMeta::new(role.as_str(), experience),
        config.session_config(),
    )?
    .with_capture(create_capture(&config.capture)?);

    eprintln!(
        "rehearse v{} — {} interview for {} ({} questions)",
        env!("CARGO_PKG_VERSION"),
        experience.label(),
        role,
        session.question_count()
    );
    eprintln!();

    let report = match &args.answers {
        Some(path) => run_from_file(&session, path).await?,
        None => run_interactive(&session).await?,
    };

    print_summary(&report);

    if let Some(output) = &args.output {
        export(&report, output, &args.format)?;
    }

    Ok(())
}

fn load_answers(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers: {}", path.display()))?;
    let parsed: AnswersFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers JSON: {}", path.display()))?;
    Ok(match parsed {
        AnswersFile::List(answers) | AnswersFile::Object { answers } => answers,
    })
}

async fn run_from_file(session: &InterviewSession, path: &Path) -> Result<InterviewReport> {
    let answers = load_answers(path)?;
    anyhow::ensure!(
        answers.len() == session.question_count(),
        "answers file has {} answers but the interview has {} questions",
        answers.len(),
        session.question_count()
    );

    for (i, answer) in answers.iter().enumerate() {
        let snapshot = session.snapshot().await;
        print_question(&snapshot);
        let assessment = session
            .submit_answer(answer)
            .await
            .with_context(|| format!("answer {} was rejected", i + 1))?;
        print_assessment(&assessment);

        if let Advance::Complete(report) = session.advance().await? {
            return Ok(*report);
        }
    }

    Ok(session.report().await?)
}

async fn run_interactive(session: &InterviewSession) -> Result<InterviewReport> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let dictation = if session.dictation_supported() {
        ", /dictate to speak, /stop to end dictation"
    } else {
        ""
    };
    eprintln!(
        "Type your answer. Blank line or /submit to submit, /clear to start over{dictation}."
    );

    loop {
        let snapshot = session.snapshot().await;
        print_question(&snapshot);

        // Answering
        let assessment = loop {
            let Some(line) = lines.next_line().await? else {
                // End of input: submit whatever is there.
                match session.submit_current().await {
                    Ok(assessment) => break assessment,
                    Err(SessionError::EmptyAnswer) => {
                        anyhow::bail!("input ended before the interview was complete")
                    }
                    Err(e) => return Err(e.into()),
                }
            };

            match line.trim() {
                "" | "/submit" => match session.submit_current().await {
                    Ok(assessment) => break assessment,
                    Err(SessionError::EmptyAnswer) => {
                        eprintln!("Please provide an answer before submitting.");
                    }
                    Err(e) => return Err(e.into()),
                },
                "/dictate" => match session.start_dictation().await {
                    Ok(()) => eprintln!("Listening... type /stop when you're done."),
                    Err(e) => eprintln!("{e}"),
                },
                "/stop" => {
                    if session.stop_dictation().await {
                        eprintln!("Your answer: {}", session.snapshot().await.answer);
                    }
                }
                "/show" => eprintln!("Your answer: {}", session.snapshot().await.answer),
                "/clear" => session.set_answer("").await?,
                _ => {
                    let current = session.snapshot().await.answer;
                    let text = if current.is_empty() {
                        line
                    } else {
                        format!("{current}\n{line}")
                    };
                    session.set_answer(&text).await?;
                }
            }

            for notice in session.take_notices().await {
                eprintln!("{}: {}", notice.title, notice.message);
            }
        };

        print_assessment(&assessment);
        eprintln!("Press Enter to continue.");
        // Any line, or end of input, continues.
        lines.next_line().await?;

        if let Advance::Complete(report) = session.advance().await? {
            return Ok(*report);
        }
    }
}

fn print_question(snapshot: &SessionSnapshot) {
    if let Some(question) = &snapshot.question {
        eprintln!(
            "{} ({}% complete)",
            snapshot.progress_label(),
            snapshot.progress_percent
        );
        eprintln!("{question}");
    }
}

fn print_assessment(assessment: &Assessment) {
    eprintln!("  Score: {}/100", assessment.score);
    eprintln!("  {}", assessment.feedback);
    eprintln!("  Strengths: {}", assessment.strengths.join(", "));
    eprintln!("  Areas to improve: {}", assessment.improvements.join(", "));
    eprintln!();
}

fn print_summary(report: &InterviewReport) {
    use comfy_table::{Cell, Table};

    let r = &report.report;
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Chars", "Score"]);
    for d in &r.details {
        table.add_row(vec![
            Cell::new(d.index + 1),
            Cell::new(d.question.as_str()),
            Cell::new(d.answer.chars().count()),
            Cell::new(d.assessment.score),
        ]);
    }

    println!("{table}");
    println!();
    println!("Overall score: {}/100 ({})", r.overall_score, r.band);
    println!("{}", r.narrative);
    println!();
    println!("Strengths: {}", r.top_strengths.join(", "));
    println!("Areas to improve: {}", r.top_improvements.join(", "));
}

fn export(report: &InterviewReport, output: &Path, format: &str) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = match format {
        "all" => vec!["json", "markdown"],
        "md" => vec!["markdown"],
        other => vec![other],
    };

    for fmt in formats {
        match fmt {
            "json" => {
                let path = output.join(format!("interview-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "markdown" => {
                let path = output.join(format!("interview-{timestamp}.md"));
                std::fs::write(&path, report.to_markdown())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => eprintln!("Unknown format: {fmt}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_file_accepts_both_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.json");
        std::fs::write(&list, r#"["one", "two"]"#).unwrap();
        assert_eq!(load_answers(&list).unwrap(), vec!["one", "two"]);

        let object = dir.path().join("object.json");
        std::fs::write(&object, r#"{"answers": ["three"]}"#).unwrap();
        assert_eq!(load_answers(&object).unwrap(), vec!["three"]);

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"answer": 3}"#).unwrap();
        assert!(load_answers(&bad).is_err());
    }
}
