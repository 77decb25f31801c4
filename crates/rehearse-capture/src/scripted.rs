//! Scripted dictation source.
//!
//! Plays back a prepared transcript for each question, a few words at a
//! time, the way a speech recognizer grows its running transcript. Scripts
//! come either from memory or from `question-<n>.txt` files in a directory
//! (`n` is 1-based).

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use rehearse_core::capture::{ActiveCapture, CaptureSource, TranscriptSink};
use rehearse_core::error::CaptureError;

pub const DEFAULT_WORDS_PER_UPDATE: usize = 3;
pub const DEFAULT_INTERVAL_MS: u64 = 250;

enum Scripts {
    Inline(Vec<String>),
    Dir(PathBuf),
}

/// Capture source that replays transcripts.
pub struct ScriptedCapture {
    scripts: Scripts,
    words_per_update: usize,
    interval: Duration,
}

impl ScriptedCapture {
    /// One script per question, in question order.
    pub fn new(scripts: Vec<String>) -> Self {
        Self {
            scripts: Scripts::Inline(scripts),
            words_per_update: DEFAULT_WORDS_PER_UPDATE,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }

    /// Read scripts lazily from `dir/question-<n>.txt`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            scripts: Scripts::Dir(dir.into()),
            words_per_update: DEFAULT_WORDS_PER_UPDATE,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }

    pub fn with_words_per_update(mut self, words: usize) -> Self {
        self.words_per_update = words.max(1);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    async fn script_for(&self, index: usize) -> Result<String, CaptureError> {
        match &self.scripts {
            Scripts::Inline(scripts) => scripts.get(index).cloned().ok_or_else(|| {
                CaptureError::Source(format!("no transcript for question {}", index + 1))
            }),
            Scripts::Dir(dir) => {
                let path = transcript_path(dir, index);
                tokio::fs::read_to_string(&path).await.map_err(|e| {
                    CaptureError::Device(format!("cannot read {}: {e}", path.display()))
                })
            }
        }
    }
}

/// Path of the transcript file for the question at `index`.
pub fn transcript_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("question-{}.txt", index + 1))
}

/// Split a transcript into the cumulative updates a recognizer would emit.
pub fn cumulative_updates(text: &str, words_per_update: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let step = words_per_update.max(1);
    let mut updates = Vec::new();
    let mut end = 0;
    while end < words.len() {
        end = (end + step).min(words.len());
        updates.push(words[..end].join(" "));
    }
    updates
}

/// A playback task; stopping or dropping it ends the stream.
struct ScriptedStream {
    stop: Option<oneshot::Sender<()>>,
}

impl ActiveCapture for ScriptedStream {
    fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
    }
}

#[async_trait]
impl CaptureSource for ScriptedCapture {
    fn name(&self) -> &str {
        "transcripts"
    }

    fn is_supported(&self) -> bool {
        true
    }

    async fn start(&self, sink: TranscriptSink) -> Result<Box<dyn ActiveCapture>, CaptureError> {
        let question = sink.question_index();
        let text = self.script_for(question).await?;
        let updates = cumulative_updates(&text, self.words_per_update);
        let interval = self.interval;
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        tracing::debug!(question, updates = updates.len(), "starting transcript playback");

        tokio::spawn(async move {
            for transcript in &updates {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = tokio::time::sleep(interval) => {}
                }
                if !sink.update(transcript).await {
                    break;
                }
            }
            tracing::debug!(question, "transcript playback finished");
        });

        Ok(Box::new(ScriptedStream {
            stop: Some(stop_tx),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rehearse_core::error::SessionError;
    use rehearse_core::model::{Question, SessionMeta};
    use rehearse_core::session::{InterviewSession, SessionConfig};

    fn session(capture: ScriptedCapture) -> InterviewSession {
        let questions = vec![Question::from("First?"), Question::from("Second?")];
        let config = SessionConfig {
            submit_latency: Duration::ZERO,
        };
        InterviewSession::new(questions, SessionMeta::default(), config)
            .unwrap()
            .with_capture(Arc::new(capture))
    }

    #[test]
    fn updates_are_cumulative() {
        assert_eq!(
            cumulative_updates("one two  three\nfour five", 2),
            vec!["one two", "one two three four", "one two three four five"]
        );
        assert_eq!(cumulative_updates("a b", 0), vec!["a", "a b"]);
        assert!(cumulative_updates("   ", 3).is_empty());
    }

    #[test]
    fn transcript_paths_are_one_based() {
        let path = transcript_path(Path::new("scripts"), 0);
        assert_eq!(path, Path::new("scripts").join("question-1.txt"));
    }

    #[tokio::test(start_paused = true)]
    async fn plays_back_full_transcript() {
        let capture = ScriptedCapture::new(vec!["one two three four five".into()])
            .with_words_per_update(2)
            .with_interval(Duration::from_millis(100));
        let s = session(capture);

        s.start_dictation().await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(s.snapshot().await.answer, "one two three four five");
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_the_answer() {
        let capture = ScriptedCapture::new(vec!["one two three four five".into()])
            .with_words_per_update(2)
            .with_interval(Duration::from_millis(100));
        let s = session(capture);

        s.start_dictation().await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(s.snapshot().await.answer, "one two");

        assert!(s.stop_dictation().await);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(s.snapshot().await.answer, "one two");
    }

    #[tokio::test(start_paused = true)]
    async fn reads_scripts_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            transcript_path(dir.path(), 0),
            "I would profile before optimizing",
        )
        .unwrap();
        let s = session(
            ScriptedCapture::from_dir(dir.path()).with_interval(Duration::from_millis(10)),
        );

        s.start_dictation().await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            s.snapshot().await.answer,
            "I would profile before optimizing"
        );
    }

    #[tokio::test]
    async fn missing_script_disables_dictation() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(ScriptedCapture::from_dir(dir.path()));
        s.set_answer("typed").await.unwrap();

        let err = s.start_dictation().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Capture(CaptureError::Device(_))
        ));
        let snap = s.snapshot().await;
        assert_eq!(snap.answer, "typed");
        assert!(!snap.dictation.available);
        assert_eq!(s.take_notices().await.len(), 1);
    }
}
