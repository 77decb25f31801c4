//! Placeholder source for hosts without speech recognition.

use async_trait::async_trait;

use rehearse_core::capture::{ActiveCapture, CaptureSource, TranscriptSink};
use rehearse_core::error::CaptureError;

/// A capture source that never dictates. Sessions using it offer typing only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl CaptureSource for Unsupported {
    fn name(&self) -> &str {
        "none"
    }

    fn is_supported(&self) -> bool {
        false
    }

    async fn start(&self, _sink: TranscriptSink) -> Result<Box<dyn ActiveCapture>, CaptureError> {
        Err(CaptureError::NotSupported(self.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rehearse_core::error::SessionError;
    use rehearse_core::model::{Question, SessionMeta};
    use rehearse_core::session::{InterviewSession, SessionConfig};

    #[tokio::test]
    async fn sessions_fall_back_to_typing() {
        let s = InterviewSession::new(
            vec![Question::from("Q?")],
            SessionMeta::default(),
            SessionConfig::default(),
        )
        .unwrap()
        .with_capture(Arc::new(Unsupported));

        assert!(!s.dictation_supported());
        assert!(!s.snapshot().await.dictation.available);
        assert!(matches!(
            s.start_dictation().await,
            Err(SessionError::DictationUnavailable(_))
        ));
    }
}
