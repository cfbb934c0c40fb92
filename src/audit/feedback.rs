//! Feedback Signal Sink
//!
//! Audible/visual cues for a hands-busy scanning workflow: the operator
//! hears success, error, and duplicate-warning signals without reading text.
//! Implementations are fire-and-forget and must never fail into the engine.

/// Sink for operator feedback signals
pub trait FeedbackSink: Send + Sync {
    fn play_success(&self);
    fn play_error(&self);
    fn play_warning(&self);
}

/// Silent sink for headless use
#[derive(Debug, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn play_success(&self) {}
    fn play_error(&self) {}
    fn play_warning(&self) {}
}

/// Counting sink for tests: records how often each signal fired
#[derive(Debug, Default)]
pub struct CountingFeedback {
    pub successes: std::sync::atomic::AtomicUsize,
    pub errors: std::sync::atomic::AtomicUsize,
    pub warnings: std::sync::atomic::AtomicUsize,
}

impl CountingFeedback {
    pub fn counts(&self) -> (usize, usize, usize) {
        use std::sync::atomic::Ordering;
        (
            self.successes.load(Ordering::SeqCst),
            self.errors.load(Ordering::SeqCst),
            self.warnings.load(Ordering::SeqCst),
        )
    }
}

impl FeedbackSink for CountingFeedback {
    fn play_success(&self) {
        self.successes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn play_error(&self) {
        self.errors.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn play_warning(&self) {
        self.warnings
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}
