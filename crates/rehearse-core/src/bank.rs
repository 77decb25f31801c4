//! Question bank: role name to an ordered question sequence.
//!
//! Ships a built-in bank and loads replacement banks from TOML files.
//! Lookup never fails; unknown roles get the default sequence.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Number of questions per role in the built-in bank.
pub const STANDARD_SET_LEN: usize = 5;

/// The question sequence for a single role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuestions {
    /// Role name, matched exactly.
    pub name: String,
    /// Questions in the order they are asked.
    pub questions: Vec<Question>,
}

/// A static mapping from role to questions, plus a fallback sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    roles: Vec<RoleQuestions>,
    default: Vec<Question>,
}

/// Intermediate TOML structure for bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    default: Vec<String>,
    #[serde(default)]
    roles: Vec<TomlRole>,
}

#[derive(Debug, Deserialize)]
struct TomlRole {
    name: String,
    questions: Vec<String>,
}

impl QuestionBank {
    /// Build a bank, rejecting any empty sequence.
    pub fn new(roles: Vec<RoleQuestions>, default: Vec<Question>) -> Result<Self> {
        anyhow::ensure!(!default.is_empty(), "default question set is empty");
        if let Some(role) = roles.iter().find(|r| r.questions.is_empty()) {
            anyhow::bail!("question set for role '{}' is empty", role.name);
        }
        Ok(Self { roles, default })
    }

    /// The bank bundled with rehearse.
    pub fn builtin() -> Self {
        let roles = BUILTIN_ROLES
            .iter()
            .map(|(name, qs)| RoleQuestions {
                name: (*name).to_string(),
                questions: to_questions(qs),
            })
            .collect();
        Self {
            roles,
            default: to_questions(&BUILTIN_DEFAULT),
        }
    }

    /// Questions for `role`, or the default sequence if the role is unknown.
    pub fn questions_for(&self, role: &str) -> &[Question] {
        self.roles
            .iter()
            .find(|r| r.name == role)
            .map(|r| r.questions.as_slice())
            .unwrap_or(&self.default)
    }

    /// Whether `role` has a dedicated sequence.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.name == role)
    }

    /// The fallback sequence.
    pub fn default_questions(&self) -> &[Question] {
        &self.default
    }

    /// All roles with dedicated sequences, in file order.
    pub fn roles(&self) -> &[RoleQuestions] {
        &self.roles
    }
}

fn to_questions(prompts: &[&str]) -> Vec<Question> {
    prompts.iter().map(|q| Question::from(*q)).collect()
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load a question bank from a TOML file.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let roles = parsed
        .roles
        .into_iter()
        .map(|r| RoleQuestions {
            name: r.name,
            questions: r.questions.into_iter().map(Question::from).collect(),
        })
        .collect();
    let default = parsed.default.into_iter().map(Question::from).collect();

    QuestionBank::new(roles, default)
        .with_context(|| format!("invalid question bank: {}", source_path.display()))
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The role (None for the default set).
    pub role: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common issues.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for role in &bank.roles {
        if role.name.trim().is_empty() {
            warnings.push(ValidationWarning {
                role: Some(role.name.clone()),
                message: "role name is blank".into(),
            });
        }
        if !seen.insert(role.name.as_str()) {
            warnings.push(ValidationWarning {
                role: Some(role.name.clone()),
                message: format!(
                    "duplicate role: {} (only the first set is used)",
                    role.name
                ),
            });
        }
    }

    let sets = std::iter::once((None, bank.default.as_slice())).chain(
        bank.roles
            .iter()
            .map(|r| (Some(r.name.clone()), r.questions.as_slice())),
    );
    for (role, questions) in sets {
        if questions.len() != STANDARD_SET_LEN {
            warnings.push(ValidationWarning {
                role: role.clone(),
                message: format!(
                    "has {} questions, expected {STANDARD_SET_LEN}",
                    questions.len()
                ),
            });
        }
        for (i, q) in questions.iter().enumerate() {
            if q.as_str().trim().is_empty() {
                warnings.push(ValidationWarning {
                    role: role.clone(),
                    message: format!("question {} is blank", i + 1),
                });
            }
        }
    }

    warnings
}

const BUILTIN_ROLES: [(&str, [&str; STANDARD_SET_LEN]); 4] = [
    (
        "Software Engineer",
        [
            "Tell me about a challenging project you've worked on recently and how you overcame obstacles.",
            "How do you approach debugging a complex issue in your code?",
            "Explain the concept of object-oriented programming and its core principles.",
            "What's your experience with version control systems and CI/CD pipelines?",
            "How do you stay updated with new technologies and programming languages?",
        ],
    ),
    (
        "Frontend Developer",
        [
            "Explain the difference between React's state and props.",
            "How do you optimize the performance of a web application?",
            "What are the key considerations for creating accessible web applications?",
            "Tell me about a responsive design challenge you faced and how you solved it.",
            "How do you handle state management in large-scale applications?",
        ],
    ),
    (
        "Backend Developer",
        [
            "Explain RESTful API design principles.",
            "How do you approach database optimization for a high-traffic application?",
            "What strategies do you use for error handling in a backend service?",
            "Tell me about your experience with microservices architecture.",
            "How do you ensure the security of API endpoints you develop?",
        ],
    ),
    (
        "Data Scientist",
        [
            "Explain the difference between supervised and unsupervised learning.",
            "How do you handle missing data in a dataset?",
            "Tell me about a data analysis project where you extracted valuable insights.",
            "What techniques do you use for feature selection?",
            "How do you evaluate the performance of a machine learning model?",
        ],
    ),
];

const BUILTIN_DEFAULT: [&str; STANDARD_SET_LEN] = [
    "Tell me about your background and experience in this field.",
    "What are your technical strengths and areas you're looking to develop?",
    "Describe a challenging problem you solved in a previous role.",
    "How do you approach learning new technologies or methodologies?",
    "Where do you see yourself professionally in the next few years?",
];
