//! Tool configuration and capture factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use rehearse_core::bank::{load_bank, QuestionBank};
use rehearse_core::capture::CaptureSource;
use rehearse_core::model::{ExperienceLevel, DEFAULT_ROLE};
use rehearse_core::session::SessionConfig;

use crate::scripted::{ScriptedCapture, DEFAULT_INTERVAL_MS, DEFAULT_WORDS_PER_UPDATE};
use crate::unsupported::Unsupported;

/// Which dictation source sessions get.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CaptureConfig {
    /// Typing only.
    #[default]
    None,
    /// Replay `question-<n>.txt` transcripts from a directory.
    Transcripts {
        dir: String,
        #[serde(default = "default_words_per_update")]
        words_per_update: usize,
        #[serde(default = "default_interval_ms")]
        interval_ms: u64,
    },
}

fn default_words_per_update() -> usize {
    DEFAULT_WORDS_PER_UPDATE
}
fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

/// Top-level rehearse configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehearseConfig {
    /// Role used when none is given on the command line.
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Experience level used when none is given.
    #[serde(default)]
    pub default_experience: ExperienceLevel,
    /// Pause before each answer is scored.
    #[serde(default = "default_submit_latency")]
    pub submit_latency_ms: u64,
    /// Question bank file; the built-in bank is used when unset.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    /// Where exported reports go.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub capture: CaptureConfig,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}
fn default_submit_latency() -> u64 {
    1500
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./rehearse-results")
}

impl Default for RehearseConfig {
    fn default() -> Self {
        Self {
            default_role: default_role(),
            default_experience: ExperienceLevel::default(),
            submit_latency_ms: default_submit_latency(),
            question_bank: None,
            output_dir: default_output_dir(),
            capture: CaptureConfig::default(),
        }
    }
}

impl RehearseConfig {
    /// Session settings derived from this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            submit_latency: Duration::from_millis(self.submit_latency_ms),
        }
    }

    /// The configured question bank, or the built-in one.
    pub fn question_bank(&self) -> Result<QuestionBank> {
        match &self.question_bank {
            Some(path) => load_bank(path),
            None => Ok(QuestionBank::builtin()),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `rehearse.toml` in the current directory
/// 2. `~/.config/rehearse/config.toml`
///
/// Environment variable override: `REHEARSE_SUBMIT_LATENCY_MS`.
pub fn load_config_from(path: Option<&Path>) -> Result<RehearseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("rehearse.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<RehearseConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RehearseConfig::default(),
    };
    if let Some(path) = &config_path {
        tracing::debug!("loaded config from {}", path.display());
    }

    if let Ok(value) = std::env::var("REHEARSE_SUBMIT_LATENCY_MS") {
        config.submit_latency_ms = value
            .trim()
            .parse()
            .with_context(|| format!("invalid REHEARSE_SUBMIT_LATENCY_MS: {value:?}"))?;
    }

    config.question_bank = config.question_bank.as_deref().map(resolve_path);
    config.output_dir = resolve_path(&config.output_dir);
    if let CaptureConfig::Transcripts { dir, .. } = &mut config.capture {
        *dir = resolve_env_vars(dir);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("rehearse"))
}

/// Create a capture source from its configuration.
pub fn create_capture(config: &CaptureConfig) -> Result<Arc<dyn CaptureSource>> {
    match config {
        CaptureConfig::None => Ok(Arc::new(Unsupported)),
        CaptureConfig::Transcripts {
            dir,
            words_per_update,
            interval_ms,
        } => {
            let dir = PathBuf::from(dir);
            if !dir.is_dir() {
                anyhow::bail!("transcript directory not found: {}", dir.display());
            }
            Ok(Arc::new(
                ScriptedCapture::from_dir(dir)
                    .with_words_per_update(*words_per_update)
                    .with_interval(Duration::from_millis(*interval_ms)),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_REHEARSE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_REHEARSE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_REHEARSE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        std::env::remove_var("_REHEARSE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = RehearseConfig::default();
        assert_eq!(config.default_role, "Software Engineer");
        assert_eq!(config.default_experience, ExperienceLevel::Mid);
        assert_eq!(config.submit_latency_ms, 1500);
        assert_eq!(config.capture, CaptureConfig::None);
        assert_eq!(
            config.session_config().submit_latency,
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
default_role = "Data Scientist"
default_experience = "senior"
submit_latency_ms = 0

[capture]
type = "transcripts"
dir = "./scripts"
"#;
        let config: RehearseConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_role, "Data Scientist");
        assert_eq!(config.default_experience, ExperienceLevel::Senior);
        assert_eq!(config.submit_latency_ms, 0);
        assert_eq!(
            config.capture,
            CaptureConfig::Transcripts {
                dir: "./scripts".into(),
                words_per_update: DEFAULT_WORDS_PER_UPDATE,
                interval_ms: DEFAULT_INTERVAL_MS,
            }
        );
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rehearse.toml");
        std::fs::write(&path, "default_role = \"QA Engineer\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_role, "QA Engineer");
        assert!(config.question_bank().unwrap().has_role("Software Engineer"));

        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn capture_factory() {
        let none = create_capture(&CaptureConfig::None).unwrap();
        assert!(!none.is_supported());

        let dir = tempfile::tempdir().unwrap();
        let scripted = create_capture(&CaptureConfig::Transcripts {
            dir: dir.path().to_string_lossy().into_owned(),
            words_per_update: 2,
            interval_ms: 10,
        })
        .unwrap();
        assert_eq!(scripted.name(), "transcripts");
        assert!(scripted.is_supported());

        assert!(create_capture(&CaptureConfig::Transcripts {
            dir: dir.path().join("nope").to_string_lossy().into_owned(),
            words_per_update: 2,
            interval_ms: 10,
        })
        .is_err());
    }
}
