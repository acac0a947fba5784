// Sweep Events
// Progress reporting and event types for two-phase sweep execution

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

/// Sender for sweep progress events
pub type ProgressSender = mpsc::UnboundedSender<SweepEvent>;

/// Receiver for sweep progress events
pub type ProgressReceiver = mpsc::UnboundedReceiver<SweepEvent>;

/// Create a new progress channel
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Events emitted during sweep execution.
///
/// Progress reporting is a side observer: events are fire-and-forget and
/// never influence result collection or ordering.
#[derive(Debug, Clone)]
pub enum SweepEvent {
    /// Validation phase started
    ValidateStarted { total: usize, workers: usize },

    /// One combination passed dependency derivation and every filter
    CombinationPassed { combo_num: usize },

    /// One combination was rejected by a filter
    CombinationFailed { combo_num: usize, filter: String },

    /// Validation phase completed
    ValidateCompleted {
        passed: usize,
        failed: usize,
        duration: Duration,
    },

    /// Generation phase started over the pass-set
    GenerateStarted { total: usize, workers: usize },

    /// One trial's artifacts were generated
    TrialCompleted { trial_num: usize, combo_num: usize },

    /// Generation phase completed
    GenerateCompleted { total: usize, duration: Duration },

    /// A summary collection was persisted
    SummaryWritten { path: PathBuf },

    /// Log message (info, warning, error)
    Log { level: LogLevel, message: String },
}

/// Log level for log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl SweepEvent {
    pub fn validate_started(total: usize, workers: usize) -> Self {
        Self::ValidateStarted { total, workers }
    }

    pub fn combination_passed(combo_num: usize) -> Self {
        Self::CombinationPassed { combo_num }
    }

    pub fn combination_failed(combo_num: usize, filter: impl Into<String>) -> Self {
        Self::CombinationFailed {
            combo_num,
            filter: filter.into(),
        }
    }

    pub fn validate_completed(passed: usize, failed: usize, duration: Duration) -> Self {
        Self::ValidateCompleted {
            passed,
            failed,
            duration,
        }
    }

    pub fn generate_started(total: usize, workers: usize) -> Self {
        Self::GenerateStarted { total, workers }
    }

    pub fn trial_completed(trial_num: usize, combo_num: usize) -> Self {
        Self::TrialCompleted {
            trial_num,
            combo_num,
        }
    }

    pub fn generate_completed(total: usize, duration: Duration) -> Self {
        Self::GenerateCompleted { total, duration }
    }

    pub fn summary_written(path: PathBuf) -> Self {
        Self::SummaryWritten { path }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Error,
            message: message.into(),
        }
    }
}

/// Helper trait for sending events, ignoring errors (fire-and-forget)
pub trait EventSender {
    fn send_event(&self, event: SweepEvent);
}

impl EventSender for ProgressSender {
    fn send_event(&self, event: SweepEvent) {
        let _ = self.send(event);
    }
}

impl EventSender for Option<ProgressSender> {
    fn send_event(&self, event: SweepEvent) {
        if let Some(sender) = self {
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_progress_channel() {
        let (tx, mut rx) = progress_channel();

        tx.send_event(SweepEvent::validate_started(12, 4));
        tx.send_event(SweepEvent::combination_failed(3, "s_too_high"));

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, SweepEvent::ValidateStarted { total: 12, .. }));

        let second = rx.recv().await.unwrap();
        if let SweepEvent::CombinationFailed { combo_num, filter } = second {
            assert_eq!(combo_num, 3);
            assert_eq!(filter, "s_too_high");
        } else {
            panic!("wrong event type");
        }
    }

    #[test]
    fn test_optional_sender_is_quiet() {
        let sender: Option<ProgressSender> = None;
        // Should not panic
        sender.send_event(SweepEvent::info("test"));
    }
}
