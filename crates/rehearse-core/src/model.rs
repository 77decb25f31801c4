//! Core data model types for rehearse.
//!
//! These are the fundamental types shared by the question bank, the
//! scoring engine, the session controller, and the aggregator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role used when the caller does not pick one.
pub const DEFAULT_ROLE: &str = "Software Engineer";

/// Roles offered by the interview setup form.
///
/// Not every role has a dedicated question set; the rest fall back to the
/// default sequence of the question bank.
pub const JOB_ROLES: [&str; 10] = [
    "Software Engineer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "DevOps Engineer",
    "Data Scientist",
    "Machine Learning Engineer",
    "Product Manager",
    "UX/UI Designer",
    "QA Engineer",
];

/// An immutable interview prompt.
///
/// Questions are identified by their index within a role's sequence; they
/// carry no identity of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question(String);

impl Question {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self(prompt.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Question {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Question {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Candidate experience level chosen at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
}

impl ExperienceLevel {
    /// Human-readable label, e.g. "Mid Level".
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Mid => "Mid Level",
            ExperienceLevel::Senior => "Senior Level",
        }
    }

    /// Years-of-experience hint shown next to the label.
    pub fn years(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "0-2 years",
            ExperienceLevel::Mid => "3-5 years",
            ExperienceLevel::Senior => "6+ years",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Entry => write!(f, "entry"),
            ExperienceLevel::Mid => write!(f, "mid"),
            ExperienceLevel::Senior => write!(f, "senior"),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry" | "junior" => Ok(ExperienceLevel::Entry),
            "mid" | "middle" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            other => Err(format!("unknown experience level: {other}")),
        }
    }
}

/// The scoring engine's verdict on a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// Score from 0 to 100.
    pub score: u32,
    /// Narrative feedback.
    pub feedback: String,
    /// Short labels for what went well, most relevant first.
    pub strengths: Vec<String>,
    /// Short labels for what to work on, most relevant first.
    pub improvements: Vec<String>,
}

/// Who is being interviewed and for what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub role: String,
    pub experience: ExperienceLevel,
}

impl SessionMeta {
    pub fn new(role: impl Into<String>, experience: ExperienceLevel) -> Self {
        Self {
            role: role.into(),
            experience,
        }
    }
}

impl Default for SessionMeta {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE, ExperienceLevel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_display_and_parse() {
        assert_eq!(ExperienceLevel::Entry.to_string(), "entry");
        assert_eq!(ExperienceLevel::Senior.label(), "Senior Level");
        assert_eq!("MID".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Mid);
        assert_eq!(
            " senior ".parse::<ExperienceLevel>().unwrap(),
            ExperienceLevel::Senior
        );
        assert!("principal".parse::<ExperienceLevel>().is_err());
    }

    #[test]
    fn meta_defaults_match_setup_form() {
        let meta = SessionMeta::default();
        assert_eq!(meta.role, "Software Engineer");
        assert_eq!(meta.experience, ExperienceLevel::Mid);
        assert!(JOB_ROLES.contains(&meta.role.as_str()));
    }

    #[test]
    fn assessment_serde_roundtrip() {
        let assessment = Assessment {
            score: 75,
            feedback: "ok".into(),
            strengths: vec!["Clear explanation".into()],
            improvements: vec![],
        };
        let json = serde_json::to_string(&assessment).unwrap();
        let back: Assessment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, assessment);
    }

    #[test]
    fn question_serializes_as_plain_string() {
        let q = Question::new("Explain RESTful API design principles.");
        assert_eq!(
            serde_json::to_string(&q).unwrap(),
            "\"Explain RESTful API design principles.\""
        );
    }
}
