//! Manually driven capture source for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use rehearse_core::capture::{ActiveCapture, CaptureSource, TranscriptSink};
use rehearse_core::error::CaptureError;

/// A capture source whose transcripts are pushed by the caller.
///
/// Every started dictation's sink is kept so tests can deliver updates or
/// errors at exactly the moment they want.
#[derive(Default)]
pub struct ManualCapture {
    /// Sinks handed out so far, in start order.
    sinks: Mutex<Vec<TranscriptSink>>,
    /// Error returned by the next `start`, if any.
    fail_next: Mutex<Option<CaptureError>>,
    /// Number of streams stopped.
    stops: Arc<AtomicU32>,
}

impl ManualCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `start` fail with `error`.
    pub fn fail_next_start(&self, error: CaptureError) {
        *self.fail_next.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// The sink of the `n`th started dictation.
    pub fn sink(&self, n: usize) -> Option<TranscriptSink> {
        self.sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(n)
            .cloned()
    }

    /// The sink of the most recent dictation.
    pub fn latest_sink(&self) -> Option<TranscriptSink> {
        self.sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of dictations started successfully.
    pub fn start_count(&self) -> usize {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of dictations the session has stopped.
    pub fn stop_count(&self) -> u32 {
        self.stops.load(Ordering::Relaxed)
    }
}

struct ManualStream {
    stops: Arc<AtomicU32>,
    stopped: bool,
}

impl ActiveCapture for ManualStream {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.stops.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl CaptureSource for ManualCapture {
    fn name(&self) -> &str {
        "manual"
    }

    fn is_supported(&self) -> bool {
        true
    }

    async fn start(&self, sink: TranscriptSink) -> Result<Box<dyn ActiveCapture>, CaptureError> {
        if let Some(error) = self
            .fail_next
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            return Err(error);
        }
        self.sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sink);
        Ok(Box::new(ManualStream {
            stops: Arc::clone(&self.stops),
            stopped: false,
        }))
    }
}
