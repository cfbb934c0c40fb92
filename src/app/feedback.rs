//! Terminal feedback signals
//!
//! Maps the engine's feedback sink onto the terminal bell so an operator
//! with both hands on the scanner hears the outcome: one bell for success,
//! two for an error, three for a duplicate warning.

use std::io::Write;

use crate::audit::api::FeedbackSink;

pub struct TerminalBellFeedback;

impl TerminalBellFeedback {
    fn ring(count: usize) {
        let mut stderr = std::io::stderr();
        for _ in 0..count {
            let _ = stderr.write_all(b"\x07");
        }
        let _ = stderr.flush();
    }
}

impl FeedbackSink for TerminalBellFeedback {
    fn play_success(&self) {
        Self::ring(1);
    }

    fn play_error(&self) {
        Self::ring(2);
    }

    fn play_warning(&self) {
        Self::ring(3);
    }
}
