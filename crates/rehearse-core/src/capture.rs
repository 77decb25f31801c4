//! Answer-capture boundary.
//!
//! Typed answers reach the session directly. Dictated answers come from a
//! [`CaptureSource`]: starting one hands it a [`TranscriptSink`] and returns
//! an [`ActiveCapture`] that the session owns and stops when the answer
//! leaves dictation mode. Implementations live in `rehearse-capture`.

use std::sync::Weak;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::CaptureError;
use crate::session::SessionState;

/// A speech-to-text collaborator that streams cumulative transcripts.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Human-readable source name (e.g. "transcripts").
    fn name(&self) -> &str;

    /// Whether dictation can be offered at all on this host.
    fn is_supported(&self) -> bool;

    /// Begin dictating for `sink.question_index()`.
    ///
    /// Each update pushed into the sink must be the full transcript so far.
    async fn start(&self, sink: TranscriptSink) -> Result<Box<dyn ActiveCapture>, CaptureError>;
}

/// A live dictation stream. Stopping releases the underlying device.
pub trait ActiveCapture: Send {
    fn stop(&mut self);
}

/// Where a capture source delivers transcripts for one dictation.
///
/// A sink only writes while its dictation is the session's live one; once
/// the dictation is stopped, replaced, or the session is gone, updates are
/// discarded and [`TranscriptSink::update`] returns `false`.
#[derive(Debug, Clone)]
pub struct TranscriptSink {
    state: Weak<Mutex<SessionState>>,
    question_index: usize,
    generation: u64,
}

impl TranscriptSink {
    pub(crate) fn new(
        state: Weak<Mutex<SessionState>>,
        question_index: usize,
        generation: u64,
    ) -> Self {
        Self {
            state,
            question_index,
            generation,
        }
    }

    /// The question this dictation belongs to.
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Replace the answer with the transcript so far.
    ///
    /// Returns `false` when the dictation is no longer live; sources should
    /// stop producing at that point.
    pub async fn update(&self, transcript: &str) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let mut state = state.lock().await;
        state.apply_transcript(self.generation, transcript)
    }

    /// Report a capture failure. Dictation is force-stopped and disabled for
    /// the rest of the session; already captured text is kept.
    pub async fn fail(&self, error: CaptureError) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.lock().await;
        state.fail_dictation(self.generation, error);
    }
}
