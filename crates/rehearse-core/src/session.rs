//! Interview session controller.
//!
//! Drives one interview through its questions:
//!
//! ```text
//! Answering(i) --submit--> Submitting(i) --scored--> Reviewing(i)
//! Reviewing(i) --continue--> Answering(i + 1)      (i < last)
//! Reviewing(last) --continue--> Complete            (report produced)
//! ```
//!
//! [`InterviewSession`] is a cheap, cloneable handle. All handles share one
//! state; every transition takes the state lock, so transitions are applied
//! one at a time and only one submission can be in flight.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::bank::QuestionBank;
use crate::capture::{ActiveCapture, CaptureSource, TranscriptSink};
use crate::error::{CaptureError, SessionError};
use crate::model::{Assessment, ExperienceLevel, Question, SessionMeta};
use crate::report::InterviewReport;
use crate::scoring::{AnswerScorer, HeuristicScorer};

/// Title of the notice raised when dictation fails.
pub const CAPTURE_NOTICE_TITLE: &str = "Speech Recognition Error";
/// Body of the notice raised when dictation fails.
pub const CAPTURE_NOTICE_MESSAGE: &str =
    "There was an issue with the microphone. You can type your answer instead.";

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pause before an answer is scored.
    pub submit_latency: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            submit_latency: Duration::from_millis(1500),
        }
    }
}

/// Where the session is in its question walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "question", rename_all = "snake_case")]
pub enum Phase {
    /// Awaiting or editing the answer at this index.
    Answering(usize),
    /// Scoring the answer at this index; input is locked.
    Submitting(usize),
    /// The assessment for this index is on display.
    Reviewing(usize),
    /// All questions answered and the report produced.
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Answering(i) => write!(f, "answering question {}", i + 1),
            Phase::Submitting(i) => write!(f, "submitting question {}", i + 1),
            Phase::Reviewing(i) => write!(f, "reviewing question {}", i + 1),
            Phase::Complete => write!(f, "complete"),
        }
    }
}

/// A message for the user that does not interrupt the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
    /// Underlying cause, for logs and verbose output.
    pub detail: String,
}

/// Whether dictation controls should be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictationStatus {
    /// A capture source is attached and supported on this host.
    pub supported: bool,
    /// Supported and not disabled by an earlier capture error.
    pub available: bool,
    /// A dictation is live for the current question.
    pub active: bool,
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    /// Zero-based index of the current question.
    pub question_index: usize,
    pub question_count: usize,
    /// The current question; `None` once complete.
    pub question: Option<Question>,
    /// The stored answer for the current question.
    pub answer: String,
    /// The assessment being reviewed, if any.
    pub feedback: Option<Assessment>,
    /// `round(question_index / question_count * 100)`, or 100 once complete.
    pub progress_percent: u32,
    pub dictation: DictationStatus,
}

impl SessionSnapshot {
    /// e.g. "Question 2 of 5".
    pub fn progress_label(&self) -> String {
        format!(
            "Question {} of {}",
            self.question_index + 1,
            self.question_count
        )
    }
}

/// Outcome of [`InterviewSession::advance`].
#[derive(Debug, Clone)]
pub enum Advance {
    /// Moved on to the next question.
    Next(SessionSnapshot),
    /// The last question was reviewed; the session is complete.
    Complete(Box<InterviewReport>),
}

/// A dictation owned by the session. Dropping it stops the capture.
struct LiveDictation {
    question_index: usize,
    generation: u64,
    capture: Box<dyn ActiveCapture>,
}

impl Drop for LiveDictation {
    fn drop(&mut self) {
        self.capture.stop();
    }
}

/// Mutable working set of one session.
pub(crate) struct SessionState {
    questions: Box<[Question]>,
    answers: Box<[String]>,
    assessments: Box<[Option<Assessment>]>,
    phase: Phase,
    current_feedback: Option<Assessment>,
    /// Generation whose transcripts may write the answer. Set as soon as a
    /// dictation is requested, before the source has finished starting.
    dictation_generation: Option<u64>,
    dictation: Option<LiveDictation>,
    next_generation: u64,
    capture_failed: bool,
    notices: Vec<Notice>,
    report: Option<InterviewReport>,
}

impl SessionState {
    fn new(questions: Vec<Question>) -> Self {
        let n = questions.len();
        Self {
            questions: questions.into_boxed_slice(),
            answers: vec![String::new(); n].into_boxed_slice(),
            assessments: vec![None; n].into_boxed_slice(),
            phase: Phase::Answering(0),
            current_feedback: None,
            dictation_generation: None,
            dictation: None,
            next_generation: 0,
            capture_failed: false,
            notices: Vec::new(),
            report: None,
        }
    }

    fn current_index(&self) -> usize {
        match self.phase {
            Phase::Answering(i) | Phase::Submitting(i) | Phase::Reviewing(i) => i,
            Phase::Complete => self.questions.len() - 1,
        }
    }

    fn answering_index(&self, action: &'static str) -> Result<usize, SessionError> {
        match self.phase {
            Phase::Answering(i) => Ok(i),
            Phase::Submitting(_) => Err(SessionError::AlreadySubmitting),
            other => Err(SessionError::InvalidTransition {
                action,
                state: other.to_string(),
            }),
        }
    }

    /// Freeze the answer and release the capture, if any.
    fn stop_dictation(&mut self, reason: &str) -> bool {
        let was_live = self.dictation_generation.take().is_some();
        if let Some(live) = self.dictation.take() {
            tracing::debug!(
                question = live.question_index,
                generation = live.generation,
                "stopping dictation: {reason}"
            );
        }
        was_live
    }

    pub(crate) fn apply_transcript(&mut self, generation: u64, transcript: &str) -> bool {
        if self.dictation_generation != Some(generation) {
            tracing::debug!(generation, "discarding transcript from stale dictation");
            return false;
        }
        let Phase::Answering(i) = self.phase else {
            return false;
        };
        // Cumulative transcript: replace, never append.
        self.answers[i].clear();
        self.answers[i].push_str(transcript);
        true
    }

    pub(crate) fn fail_dictation(&mut self, generation: u64, error: CaptureError) {
        if self.dictation_generation != Some(generation) {
            tracing::debug!(generation, "ignoring error from stale dictation: {error}");
            return;
        }
        self.record_capture_failure(&error);
        self.stop_dictation("capture error");
    }

    fn record_capture_failure(&mut self, error: &CaptureError) {
        tracing::warn!("dictation disabled after capture error: {error}");
        self.capture_failed = true;
        self.notices.push(Notice {
            title: CAPTURE_NOTICE_TITLE.into(),
            message: CAPTURE_NOTICE_MESSAGE.into(),
            detail: error.to_string(),
        });
    }
}

/// Handle to one interview run.
#[derive(Clone)]
pub struct InterviewSession {
    id: Uuid,
    meta: SessionMeta,
    question_count: usize,
    state: Arc<Mutex<SessionState>>,
    scorer: Arc<dyn AnswerScorer>,
    capture: Option<Arc<dyn CaptureSource>>,
    config: SessionConfig,
    started: Instant,
}

impl fmt::Debug for InterviewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterviewSession")
            .field("id", &self.id)
            .field("meta", &self.meta)
            .field("question_count", &self.question_count)
            .field("scorer", &self.scorer.name())
            .field("capture", &self.capture.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

/// Start a session for `role` using the bank, the heuristic scorer, and
/// default configuration. Unknown roles get the bank's default questions.
pub fn start_session(
    bank: &QuestionBank,
    role: &str,
    experience: ExperienceLevel,
) -> Result<InterviewSession, SessionError> {
    InterviewSession::new(
        bank.questions_for(role).to_vec(),
        SessionMeta::new(role, experience),
        SessionConfig::default(),
    )
}

impl InterviewSession {
    /// Create a session over a fixed question sequence.
    pub fn new(
        questions: Vec<Question>,
        meta: SessionMeta,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::InvalidInput(
                "a session needs at least one question".into(),
            ));
        }
        let id = Uuid::new_v4();
        tracing::info!(
            session = %id,
            role = %meta.role,
            experience = %meta.experience,
            "starting interview with {} questions",
            questions.len()
        );
        Ok(Self {
            id,
            meta,
            question_count: questions.len(),
            state: Arc::new(Mutex::new(SessionState::new(questions))),
            scorer: Arc::new(HeuristicScorer),
            capture: None,
            config,
            started: Instant::now(),
        })
    }

    /// Replace the scorer.
    pub fn with_scorer(mut self, scorer: Arc<dyn AnswerScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Attach a dictation source.
    pub fn with_capture(mut self, capture: Arc<dyn CaptureSource>) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn meta(&self) -> &SessionMeta {
        &self.meta
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Whether dictation can be offered at all.
    pub fn dictation_supported(&self) -> bool {
        self.capture.as_ref().is_some_and(|c| c.is_supported())
    }

    /// Current view of the session.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        self.snapshot_of(&state)
    }

    fn snapshot_of(&self, state: &SessionState) -> SessionSnapshot {
        let index = state.current_index();
        let complete = state.phase == Phase::Complete;
        let progress_percent = if complete {
            100
        } else {
            (index as f64 / self.question_count as f64 * 100.0).round() as u32
        };
        let supported = self.dictation_supported();
        SessionSnapshot {
            phase: state.phase,
            question_index: index,
            question_count: self.question_count,
            question: (!complete).then(|| state.questions[index].clone()),
            answer: state.answers[index].clone(),
            feedback: state.current_feedback.clone(),
            progress_percent,
            dictation: DictationStatus {
                supported,
                available: supported && !state.capture_failed,
                active: state.dictation_generation.is_some(),
            },
        }
    }

    /// The question being answered or reviewed; `None` once complete.
    pub async fn current_question(&self) -> Option<Question> {
        let state = self.state.lock().await;
        match state.phase {
            Phase::Complete => None,
            _ => Some(state.questions[state.current_index()].clone()),
        }
    }

    /// Typed edit: replace the current answer.
    ///
    /// Typing ends any live dictation first; the two modes never write the
    /// same answer at once.
    pub async fn set_answer(&self, text: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let index = state.answering_index("edit the answer")?;
        state.stop_dictation("typed edit");
        state.answers[index] = text.to_string();
        Ok(())
    }

    /// Store `text` as the current answer and submit it.
    pub async fn submit_answer(&self, text: &str) -> Result<Assessment, SessionError> {
        self.submit(Some(text)).await
    }

    /// Submit the answer already stored for the current question.
    pub async fn submit_current(&self) -> Result<Assessment, SessionError> {
        self.submit(None).await
    }

    async fn submit(&self, text: Option<&str>) -> Result<Assessment, SessionError> {
        let (index, answer) = {
            let mut state = self.state.lock().await;
            let index = state.answering_index("submit an answer")?;
            state.stop_dictation("answer submitted");
            let answer = match text {
                Some(t) => t.to_string(),
                None => state.answers[index].clone(),
            };
            if answer.trim().is_empty() {
                return Err(SessionError::EmptyAnswer);
            }
            state.answers[index] = answer.clone();
            state.phase = Phase::Submitting(index);
            (index, answer)
        };
        tracing::debug!(session = %self.id, question = index, "submitting answer");

        // Scoring runs on its own task: once Submitting is entered it always
        // reaches Reviewing, even if this future is dropped.
        let id = self.id;
        let latency = self.config.submit_latency;
        let scorer = Arc::clone(&self.scorer);
        let shared = Arc::clone(&self.state);
        let scoring = tokio::spawn(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let assessment = scorer.score(&answer);

            let mut state = shared.lock().await;
            state.assessments[index] = Some(assessment.clone());
            state.current_feedback = Some(assessment.clone());
            state.phase = Phase::Reviewing(index);
            tracing::debug!(
                session = %id,
                question = index,
                score = assessment.score,
                "answer assessed"
            );
            assessment
        });

        match scoring.await {
            Ok(assessment) => Ok(assessment),
            // The task is never aborted, so this is a scorer panic.
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    /// Leave the review of the current answer.
    ///
    /// Moves to the next question, or completes the session after the last
    /// one. Completion re-scores every stored answer and aggregates the
    /// fresh assessments.
    pub async fn advance(&self) -> Result<Advance, SessionError> {
        let mut state = self.state.lock().await;
        let index = match state.phase {
            Phase::Reviewing(i) => i,
            Phase::Submitting(_) => return Err(SessionError::AlreadySubmitting),
            other => {
                return Err(SessionError::InvalidTransition {
                    action: "continue",
                    state: other.to_string(),
                })
            }
        };

        state.current_feedback = None;
        state.stop_dictation("question advanced");

        if index + 1 < self.question_count {
            state.phase = Phase::Answering(index + 1);
            tracing::debug!(session = %self.id, question = index + 1, "next question");
            return Ok(Advance::Next(self.snapshot_of(&state)));
        }

        let assessments: Vec<Assessment> =
            state.answers.iter().map(|a| self.scorer.score(a)).collect();
        let report = aggregate(&state.questions, &state.answers, &assessments)?;
        let report = InterviewReport::new(
            self.id,
            &self.meta,
            self.scorer.name(),
            self.started.elapsed(),
            report,
        );
        state.phase = Phase::Complete;
        state.report = Some(report.clone());
        tracing::info!(
            session = %self.id,
            overall = report.report.overall_score,
            band = %report.report.band,
            "interview complete"
        );
        Ok(Advance::Complete(Box::new(report)))
    }

    /// The final report; fails with `NotComplete` until the session is.
    pub async fn report(&self) -> Result<InterviewReport, SessionError> {
        let state = self.state.lock().await;
        state.report.clone().ok_or(SessionError::NotComplete)
    }

    /// Start dictating the current answer.
    ///
    /// Clears the answer, then streams transcripts into it until stopped.
    /// Restarting on the same question clears the previous dictation's text.
    /// If the source fails to start, the previous answer is restored and
    /// dictation is disabled for the rest of the session.
    pub async fn start_dictation(&self) -> Result<(), SessionError> {
        let Some(source) = self.capture.clone() else {
            return Err(SessionError::DictationUnavailable(
                "no capture source configured".into(),
            ));
        };
        if !source.is_supported() {
            return Err(SessionError::DictationUnavailable(format!(
                "capture source '{}' is not supported here",
                source.name()
            )));
        }

        let (index, generation, previous) = {
            let mut state = self.state.lock().await;
            let index = state.answering_index("start dictation")?;
            if state.capture_failed {
                return Err(SessionError::DictationUnavailable(
                    "disabled after an earlier capture error".into(),
                ));
            }
            state.stop_dictation("dictation restarted");
            let generation = state.next_generation;
            state.next_generation += 1;
            state.dictation_generation = Some(generation);
            let previous = std::mem::take(&mut state.answers[index]);
            (index, generation, previous)
        };

        let sink = TranscriptSink::new(Arc::downgrade(&self.state), index, generation);
        // The lock is not held here: sources may deliver transcripts from
        // inside `start`.
        let started = source.start(sink).await;

        let mut state = self.state.lock().await;
        match started {
            Ok(capture) => {
                let live = LiveDictation {
                    question_index: index,
                    generation,
                    capture,
                };
                if state.dictation_generation == Some(generation) {
                    tracing::debug!(
                        question = index,
                        generation,
                        source = source.name(),
                        "dictation started"
                    );
                    state.dictation = Some(live);
                } else {
                    // Stopped or superseded while starting; dropping `live`
                    // releases the capture.
                    tracing::debug!(
                        question = index,
                        generation,
                        "dictation ended before it started"
                    );
                }
                Ok(())
            }
            Err(error) => {
                if state.dictation_generation == Some(generation) {
                    state.dictation_generation = None;
                    if state.answers[index].is_empty() {
                        state.answers[index] = previous;
                    }
                    state.record_capture_failure(&error);
                } else {
                    tracing::debug!(
                        generation,
                        "ignoring start failure of superseded dictation: {error}"
                    );
                }
                Err(SessionError::Capture(error))
            }
        }
    }

    /// Stop dictating; the answer keeps its last transcript.
    /// Returns `false` if no dictation was live.
    pub async fn stop_dictation(&self) -> bool {
        let mut state = self.state.lock().await;
        state.stop_dictation("stopped by user")
    }

    /// Drain notices raised since the last call.
    pub async fn take_notices(&self) -> Vec<Notice> {
        let mut state = self.state.lock().await;
        std::mem::take(&mut state.notices)
    }
}
