//! Interview report envelope with JSON persistence and progress tracking.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::Report;
use crate::model::{ExperienceLevel, SessionMeta};

/// Placeholder shown for a question left unanswered.
pub const NO_ANSWER: &str = "No answer provided";

/// A finished interview: who, when, and the aggregated outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// The session that produced this report.
    pub session_id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Role the interview was for.
    pub role: String,
    /// Candidate experience level.
    pub experience: ExperienceLevel,
    /// Name of the scorer that assessed the answers.
    pub scorer: String,
    /// Wall-clock session duration in milliseconds.
    pub duration_ms: u64,
    /// Aggregated outcome.
    pub report: Report,
}

impl InterviewReport {
    pub fn new(
        session_id: Uuid,
        meta: &SessionMeta,
        scorer: &str,
        elapsed: Duration,
        report: Report,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            created_at: Utc::now(),
            role: meta.role.clone(),
            experience: meta.experience,
            scorer: scorer.to_string(),
            duration_ms: elapsed.as_millis() as u64,
            report,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: InterviewReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let r = &self.report;
        let mut md = String::new();

        let _ = writeln!(md, "# Interview Results\n");
        let _ = writeln!(
            md,
            "{} • {} ({})\n",
            self.role,
            self.experience.label(),
            self.experience.years()
        );
        let _ = writeln!(md, "**Overall score:** {}/100 ({})\n", r.overall_score, r.band);
        let _ = writeln!(md, "{}\n", r.narrative);

        md.push_str("## Strengths\n\n");
        for s in &r.top_strengths {
            let _ = writeln!(md, "- {s}");
        }
        md.push_str("\n## Areas to Improve\n\n");
        for i in &r.top_improvements {
            let _ = writeln!(md, "- {i}");
        }

        md.push_str("\n## Question-by-Question Analysis\n");
        for d in &r.details {
            let answer = if d.answer.trim().is_empty() {
                NO_ANSWER
            } else {
                d.answer.as_str()
            };
            let _ = writeln!(md, "\n### {}. {}\n", d.index + 1, d.question);
            let _ = writeln!(md, "**Score:** {}/100\n", d.assessment.score);
            let _ = writeln!(md, "> {answer}\n");
            let _ = writeln!(md, "{}\n", d.assessment.feedback);
            let _ = writeln!(md, "- Strengths: {}", d.assessment.strengths.join(", "));
            let _ = writeln!(
                md,
                "- Areas to improve: {}",
                d.assessment.improvements.join(", ")
            );
        }

        md
    }

    /// Compare this report against an earlier one for the same candidate.
    pub fn compare(&self, baseline: &InterviewReport) -> ProgressReport {
        let current = &self.report;
        let previous = &baseline.report;

        // Per-question deltas only make sense when both runs asked the same
        // questions in the same order.
        let same_questions = current.details.len() == previous.details.len()
            && current
                .details
                .iter()
                .zip(&previous.details)
                .all(|(a, b)| a.question == b.question);

        let per_question = if same_questions {
            current
                .details
                .iter()
                .zip(&previous.details)
                .map(|(now, before)| QuestionDelta {
                    index: now.index,
                    baseline_score: before.assessment.score,
                    current_score: now.assessment.score,
                    delta: now.assessment.score as i64 - before.assessment.score as i64,
                })
                .collect()
        } else {
            Vec::new()
        };

        let resolved_improvements = previous
            .top_improvements
            .iter()
            .filter(|label| !current.top_improvements.contains(label))
            .cloned()
            .collect();
        let new_improvements = current
            .top_improvements
            .iter()
            .filter(|label| !previous.top_improvements.contains(label))
            .cloned()
            .collect();

        ProgressReport {
            baseline_score: previous.overall_score,
            current_score: current.overall_score,
            delta: current.overall_score as i64 - previous.overall_score as i64,
            same_questions,
            per_question,
            resolved_improvements,
            new_improvements,
        }
    }
}

/// Result of comparing two interview reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub baseline_score: u32,
    pub current_score: u32,
    /// `current_score - baseline_score`.
    pub delta: i64,
    /// Whether both runs used the same question sequence.
    pub same_questions: bool,
    /// Per-question deltas; empty unless `same_questions`.
    pub per_question: Vec<QuestionDelta>,
    /// Improvement areas flagged before but not anymore.
    pub resolved_improvements: Vec<String>,
    /// Improvement areas flagged now but not before.
    pub new_improvements: Vec<String>,
}

/// Score change for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDelta {
    pub index: usize,
    pub baseline_score: u32,
    pub current_score: u32,
    pub delta: i64,
}

impl ProgressReport {
    /// Returns true if the overall score went down.
    pub fn has_regressed(&self) -> bool {
        self.delta < 0
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        let _ = writeln!(
            md,
            "**Overall:** {} -> {} ({:+})\n",
            self.baseline_score, self.current_score, self.delta
        );

        if !self.per_question.is_empty() {
            md.push_str("| Question | Baseline | Current | Delta |\n");
            md.push_str("|----------|----------|---------|-------|\n");
            for q in &self.per_question {
                let _ = writeln!(
                    md,
                    "| {} | {} | {} | {:+} |",
                    q.index + 1,
                    q.baseline_score,
                    q.current_score,
                    q.delta
                );
            }
            md.push('\n');
        }

        if !self.resolved_improvements.is_empty() {
            let _ = writeln!(md, "Resolved: {}", self.resolved_improvements.join(", "));
        }
        if !self.new_improvements.is_empty() {
            let _ = writeln!(md, "New focus areas: {}", self.new_improvements.join(", "));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::model::{Assessment, Question};
    use crate::scoring::score_answer;

    fn make_report(answers: &[&str]) -> InterviewReport {
        let questions: Vec<Question> = (1..=answers.len())
            .map(|i| Question::new(format!("Question {i}?")))
            .collect();
        let answers: Vec<String> = answers.iter().map(|a| a.to_string()).collect();
        let assessments: Vec<Assessment> = answers.iter().map(|a| score_answer(a)).collect();
        let report = aggregate(&questions, &answers, &assessments).unwrap();
        InterviewReport::new(
            Uuid::nil(),
            &SessionMeta::default(),
            "heuristic",
            Duration::from_millis(1200),
            report,
        )
    }

    #[test]
    fn json_roundtrip() {
        let long = "long answer ".repeat(10);
        let report = make_report(&["short", long.as_str()]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = InterviewReport::load_json(&path).unwrap();

        assert_eq!(loaded, report);
        assert_eq!(loaded.duration_ms, 1200);
        assert!(InterviewReport::load_json(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn markdown_lists_every_question() {
        let report = make_report(&["A reasonably detailed answer here.", "   "]);
        let md = report.to_markdown();
        assert!(md.contains("Software Engineer • Mid Level (3-5 years)"));
        assert!(md.contains("### 1. Question 1?"));
        assert!(md.contains("### 2. Question 2?"));
        assert!(md.contains(NO_ANSWER));
        assert!(md.contains("## Areas to Improve"));
    }

    #[test]
    fn compare_same_questions_reports_deltas() {
        let thorough = "much more thorough ".repeat(8);
        let baseline = make_report(&["too short", "too short"]);
        let current = make_report(&["too short", thorough.as_str()]);

        let progress = current.compare(&baseline);
        assert!(progress.same_questions);
        assert_eq!(progress.baseline_score, 60);
        assert_eq!(progress.current_score, 75);
        assert_eq!(progress.delta, 15);
        assert!(!progress.has_regressed());
        assert_eq!(progress.per_question[0].delta, 0);
        assert_eq!(progress.per_question[1].delta, 30);
    }

    #[test]
    fn compare_tracks_improvement_areas() {
        let thorough = "much more thorough ".repeat(8);
        let baseline = make_report(&["too short", "too short"]);
        let current = make_report(&[thorough.as_str(), thorough.as_str()]);

        let progress = current.compare(&baseline);
        assert_eq!(progress.delta, 30);
        assert_eq!(progress.resolved_improvements.len(), 3);
        assert!(progress
            .resolved_improvements
            .contains(&"Add specific examples".to_string()));
        assert_eq!(
            progress.new_improvements,
            vec!["Consider mentioning alternative approaches"]
        );
    }

    #[test]
    fn compare_different_question_sets_skips_per_question() {
        let baseline = make_report(&["one", "two", "three"]);
        let current = make_report(&["one"]);
        let progress = current.compare(&baseline);
        assert!(!progress.same_questions);
        assert!(progress.per_question.is_empty());
        assert!(progress.resolved_improvements.is_empty());
    }

    #[test]
    fn progress_markdown() {
        let detailed = "detailed ".repeat(20);
        let baseline = make_report(&[detailed.as_str()]);
        let current = make_report(&["short"]);
        let progress = current.compare(&baseline);
        assert!(progress.has_regressed());
        let md = progress.to_markdown();
        assert!(md.contains("90 -> 60 (-30)"));
        assert!(md.contains("| 1 | 90 | 60 | -30 |"));
    }
}
