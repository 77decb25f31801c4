//! Session and capture error types.
//!
//! Every failure in the interview core is local: a rejected transition
//! leaves the session untouched, and a capture failure only downgrades
//! dictation to typed input. Nothing here is fatal to the process.

use thiserror::Error;

/// Errors reported by an answer-capture source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The source cannot dictate on this host (no speech engine available).
    #[error("dictation is not supported by capture source '{0}'")]
    NotSupported(String),

    /// The microphone or input device failed.
    #[error("capture device error: {0}")]
    Device(String),

    /// The transcript stream ended unexpectedly.
    #[error("transcript stream interrupted: {0}")]
    Interrupted(String),

    /// Any other failure reported by the speech-to-text collaborator.
    #[error("capture source error: {0}")]
    Source(String),
}

/// Errors returned by session transitions and aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Submit attempted with blank or whitespace-only text.
    #[error("answer is empty")]
    EmptyAnswer,

    /// A submit or continue arrived while a submission is still being scored.
    #[error("an answer is already being submitted")]
    AlreadySubmitting,

    /// The requested action is not valid in the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: String },

    /// Dictation was requested but is not offered for this session.
    #[error("dictation is unavailable: {0}")]
    DictationUnavailable(String),

    /// The report was requested before the session completed.
    #[error("session is not complete")]
    NotComplete,

    /// Input that the aggregator or controller cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The capture source failed while starting dictation.
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

impl SessionError {
    /// Returns `true` if the caller can simply retry after correcting input
    /// or waiting for the in-flight submission.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::EmptyAnswer
                | SessionError::AlreadySubmitting
                | SessionError::DictationUnavailable(_)
                | SessionError::Capture(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(SessionError::EmptyAnswer.to_string(), "answer is empty");
        let err = SessionError::InvalidTransition {
            action: "submit",
            state: "reviewing question 2".into(),
        };
        assert_eq!(err.to_string(), "cannot submit while reviewing question 2");
    }

    #[test]
    fn capture_errors_convert_and_stay_recoverable() {
        let err: SessionError = CaptureError::Device("no microphone".into()).into();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "capture device error: no microphone");
        assert!(!SessionError::NotComplete.is_recoverable());
    }
}
