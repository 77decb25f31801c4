//! Session-level aggregation of per-question assessments.
//!
//! Reduces the assessments of a finished session into a [`Report`]: mean
//! score, the most frequent strengths and improvement areas, a narrative
//! band, and the per-question detail.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{Assessment, Question};

/// How many strengths / improvements the report highlights.
pub const TOP_LABELS: usize = 3;

/// Overall performance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Excellent,
    Good,
    NeedsPreparation,
}

impl Band {
    /// Band for an overall score. Lower bounds are inclusive.
    pub fn for_score(score: u32) -> Self {
        if score >= 85 {
            Band::Excellent
        } else if score >= 70 {
            Band::Good
        } else {
            Band::NeedsPreparation
        }
    }

    /// Narrative shown alongside the overall score.
    pub fn message(&self) -> &'static str {
        match self {
            Band::Excellent => "Excellent job! Your interview responses demonstrate strong technical knowledge and effective communication. You're likely to make a positive impression on hiring managers.",
            Band::Good => "Good performance! Your responses show solid understanding of the role. With some targeted improvements, you can further increase your chances of success.",
            Band::NeedsPreparation => "You have a good foundation but need additional preparation. Focus on the improvement areas identified and consider practicing more interview scenarios.",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::Excellent => write!(f, "excellent"),
            Band::Good => write!(f, "good"),
            Band::NeedsPreparation => write!(f, "needs preparation"),
        }
    }
}

/// One question with the answer given and its assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetail {
    /// Zero-based position in the session.
    pub index: usize,
    pub question: Question,
    pub answer: String,
    pub assessment: Assessment,
}

/// The aggregated outcome of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Rounded mean of the per-question scores.
    pub overall_score: u32,
    pub band: Band,
    /// Narrative for `band`.
    pub narrative: String,
    /// Most frequent strengths, at most [`TOP_LABELS`].
    pub top_strengths: Vec<String>,
    /// Most frequent improvement areas, at most [`TOP_LABELS`].
    pub top_improvements: Vec<String>,
    /// Per-question detail in question order.
    pub details: Vec<QuestionDetail>,
}

/// Aggregate a finished session.
///
/// The three slices are parallel: entry `i` of each belongs to question `i`.
/// Fails with [`SessionError::InvalidInput`] when there is nothing to
/// aggregate or the slices disagree in length.
pub fn aggregate(
    questions: &[Question],
    answers: &[String],
    assessments: &[Assessment],
) -> Result<Report, SessionError> {
    if assessments.is_empty() {
        return Err(SessionError::InvalidInput(
            "cannot aggregate zero assessments".into(),
        ));
    }
    if questions.len() != assessments.len() || answers.len() != assessments.len() {
        return Err(SessionError::InvalidInput(format!(
            "mismatched lengths: {} questions, {} answers, {} assessments",
            questions.len(),
            answers.len(),
            assessments.len()
        )));
    }

    let overall_score = mean_score(assessments);
    let band = Band::for_score(overall_score);

    let top_strengths =
        rank_labels(assessments.iter().flat_map(|a| a.strengths.iter()), TOP_LABELS);
    let top_improvements =
        rank_labels(assessments.iter().flat_map(|a| a.improvements.iter()), TOP_LABELS);

    let details = questions
        .iter()
        .zip(answers)
        .zip(assessments)
        .enumerate()
        .map(|(index, ((question, answer), assessment))| QuestionDetail {
            index,
            question: question.clone(),
            answer: answer.clone(),
            assessment: assessment.clone(),
        })
        .collect();

    tracing::debug!(overall_score, %band, "aggregated {} assessments", assessments.len());

    Ok(Report {
        overall_score,
        band,
        narrative: band.message().to_string(),
        top_strengths,
        top_improvements,
        details,
    })
}

/// Rounded mean score; halves round up. Callers guarantee a non-empty slice.
fn mean_score(assessments: &[Assessment]) -> u32 {
    let total: u64 = assessments.iter().map(|a| u64::from(a.score)).sum();
    (total as f64 / assessments.len() as f64).round() as u32
}

/// Count label occurrences and return the `limit` most frequent.
///
/// Ties keep the order in which labels were first seen.
pub fn rank_labels<'a, I>(labels: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for label in labels {
        match positions.get(label.as_str()) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(label.as_str(), counts.len());
                counts.push((label.as_str(), 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(label, _)| label.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_answer;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn assessment(score: u32, strengths: &[&str], improvements: &[&str]) -> Assessment {
        Assessment {
            score,
            feedback: String::new(),
            strengths: labels(strengths),
            improvements: labels(improvements),
        }
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let all = labels(&["A", "B", "C", "A", "B"]);
        assert_eq!(rank_labels(&all, 3), vec!["A", "B", "C"]);
    }

    #[test]
    fn higher_counts_rank_first() {
        let all = labels(&["X", "Y", "Y", "Z", "Z", "Z", "W"]);
        assert_eq!(rank_labels(&all, 3), vec!["Z", "Y", "X"]);
        assert_eq!(rank_labels(&all, 10).len(), 4);
        assert!(rank_labels(&Vec::<String>::new(), 3).is_empty());
    }

    #[test]
    fn band_boundaries_are_inclusive_below() {
        assert_eq!(Band::for_score(100), Band::Excellent);
        assert_eq!(Band::for_score(85), Band::Excellent);
        assert_eq!(Band::for_score(84), Band::Good);
        assert_eq!(Band::for_score(70), Band::Good);
        assert_eq!(Band::for_score(69), Band::NeedsPreparation);
        assert_eq!(Band::for_score(0), Band::NeedsPreparation);
        assert!(Band::Good.message().starts_with("Good performance!"));
    }

    #[test]
    fn empty_input_is_invalid() {
        let err = aggregate(&[], &[], &[]).unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
    }

    #[test]
    fn mismatched_lengths_are_invalid() {
        let questions = vec![Question::from("Q1"), Question::from("Q2")];
        let answers = labels(&["a"]);
        let assessments = vec![score_answer("a")];
        let err = aggregate(&questions, &answers, &assessments).unwrap_err();
        assert!(err.to_string().contains("mismatched lengths"));
    }

    #[test]
    fn mean_rounds_half_up() {
        let assessments = vec![assessment(60, &[], &[]), assessment(75, &[], &[])];
        assert_eq!(mean_score(&assessments), 68); // 67.5
        let assessments = vec![
            assessment(60, &[], &[]),
            assessment(60, &[], &[]),
            assessment(75, &[], &[]),
        ];
        assert_eq!(mean_score(&assessments), 65);
    }

    #[test]
    fn software_engineer_scenario() {
        let lengths = [10, 50, 150, 10, 150];
        let questions: Vec<Question> = (1..=5).map(|i| Question::new(format!("Q{i}"))).collect();
        let answers: Vec<String> = lengths.iter().map(|&n| "x".repeat(n)).collect();
        let assessments: Vec<Assessment> = answers.iter().map(|a| score_answer(a)).collect();

        let scores: Vec<u32> = assessments.iter().map(|a| a.score).collect();
        assert_eq!(scores, vec![60, 75, 90, 60, 90]);

        let report = aggregate(&questions, &answers, &assessments).unwrap();
        assert_eq!(report.overall_score, 75);
        assert_eq!(report.band, Band::Good);
        assert_eq!(report.narrative, Band::Good.message());

        // Two brief + two detailed answers tie at 2; brief was seen first.
        assert_eq!(
            report.top_strengths,
            vec!["Concise communication", "Comprehensive explanation", "Relevant examples"]
        );
        assert_eq!(
            report.top_improvements,
            vec![
                "Add specific examples",
                "Elaborate on your approach",
                "Connect to job requirements"
            ]
        );

        assert_eq!(report.details.len(), 5);
        assert_eq!(report.details[2].index, 2);
        assert_eq!(report.details[2].question.as_str(), "Q3");
        assert_eq!(report.details[2].assessment.score, 90);
    }
}
