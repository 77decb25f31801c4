//! Answer scoring.
//!
//! [`AnswerScorer`] is the seam where a real evaluator plugs in. The only
//! implementation today is [`HeuristicScorer`], a length-banded placeholder
//! whose thresholds and outputs are nonetheless a stable contract.

use crate::model::Assessment;

/// Turns one answer into an [`Assessment`].
///
/// Implementations must be total: every string, including the empty one,
/// yields an assessment.
pub trait AnswerScorer: Send + Sync {
    /// Human-readable scorer name (e.g. "heuristic").
    fn name(&self) -> &str;

    /// Assess a single answer.
    fn score(&self, answer: &str) -> Assessment;
}

/// Answers shorter than this many characters are "brief".
pub const BRIEF_LIMIT: usize = 20;
/// Answers shorter than this many characters (and not brief) are "adequate".
pub const DETAILED_LIMIT: usize = 100;

/// Length band an answer falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBand {
    Brief,
    Adequate,
    Detailed,
}

impl LengthBand {
    /// Classify by character count. Bands are `< 20`, `< 100`, and the rest.
    pub fn of(answer: &str) -> Self {
        let len = answer.chars().count();
        if len < BRIEF_LIMIT {
            LengthBand::Brief
        } else if len < DETAILED_LIMIT {
            LengthBand::Adequate
        } else {
            LengthBand::Detailed
        }
    }
}

/// Deterministic length-based scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl AnswerScorer for HeuristicScorer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn score(&self, answer: &str) -> Assessment {
        score_answer(answer)
    }
}

/// Score an answer with the length heuristic.
pub fn score_answer(answer: &str) -> Assessment {
    match LengthBand::of(answer) {
        LengthBand::Brief => assessment(
            60,
            "Your answer was quite brief. Consider providing more details and concrete examples to strengthen your response.",
            &["Concise communication"],
            &[
                "Add specific examples",
                "Elaborate on your approach",
                "Connect to job requirements",
            ],
        ),
        LengthBand::Adequate => assessment(
            75,
            "You provided a good answer with some details. Including more specific examples and technical context would make it even stronger.",
            &["Clear explanation", "Logical structure"],
            &["Add more technical details", "Provide measurable outcomes"],
        ),
        LengthBand::Detailed => assessment(
            90,
            "Excellent response with detailed examples and technical depth. Your answer demonstrates both knowledge and practical experience.",
            &[
                "Comprehensive explanation",
                "Relevant examples",
                "Technical proficiency",
            ],
            &["Consider mentioning alternative approaches"],
        ),
    }
}

fn assessment(score: u32, feedback: &str, strengths: &[&str], improvements: &[&str]) -> Assessment {
    Assessment {
        score,
        feedback: feedback.to_string(),
        strengths: strengths.iter().map(|s| s.to_string()).collect(),
        improvements: improvements.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_short_answers_are_brief() {
        assert_eq!(score_answer("").score, 60);
        let a = score_answer("I like Rust.");
        assert_eq!(a.score, 60);
        assert_eq!(a.strengths, vec!["Concise communication"]);
        assert_eq!(a.improvements.len(), 3);
        assert!(a.feedback.contains("quite brief"));
    }

    #[test]
    fn band_boundaries_use_the_higher_band() {
        assert_eq!(score_answer(&"a".repeat(19)).score, 60);
        assert_eq!(score_answer(&"a".repeat(20)).score, 75);
        assert_eq!(score_answer(&"a".repeat(99)).score, 75);
        assert_eq!(score_answer(&"a".repeat(100)).score, 90);
        assert_eq!(score_answer(&"a".repeat(5000)).score, 90);
    }

    #[test]
    fn adequate_band_outputs() {
        let a = score_answer("I would add logging and bisect the failing commit.");
        assert_eq!(a.score, 75);
        assert_eq!(a.strengths, vec!["Clear explanation", "Logical structure"]);
        assert_eq!(
            a.improvements,
            vec!["Add more technical details", "Provide measurable outcomes"]
        );
    }

    #[test]
    fn detailed_band_outputs() {
        let a = score_answer(&"word ".repeat(40));
        assert_eq!(a.score, 90);
        assert_eq!(a.strengths.len(), 3);
        assert_eq!(
            a.improvements,
            vec!["Consider mentioning alternative approaches"]
        );
        assert!(a.feedback.starts_with("Excellent response"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 19 characters, 38 bytes.
        let accented = "é".repeat(19);
        assert!(accented.len() >= BRIEF_LIMIT);
        assert_eq!(LengthBand::of(&accented), LengthBand::Brief);
        assert_eq!(LengthBand::of(&"é".repeat(20)), LengthBand::Adequate);
    }

    #[test]
    fn whitespace_counts_toward_length() {
        assert_eq!(score_answer(&" ".repeat(25)).score, 75);
    }

    #[test]
    fn scoring_is_pure() {
        let scorer = HeuristicScorer;
        let answer = "Version control with trunk-based development and CI gates.";
        assert_eq!(scorer.score(answer), scorer.score(answer));
        assert_eq!(scorer.name(), "heuristic");
    }
}
