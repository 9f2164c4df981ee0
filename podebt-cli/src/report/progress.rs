//! Run progress notifications
//!
//! A processing run emits an ordered sequence of `{step, percent}` events
//! to a single listening consumer, terminating in either a completion
//! summary or an error message. Sending never blocks the pipeline.

use serde::Serialize;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// One notification in the progress stream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Progress {
        step: String,
        percent: u8,
    },
    Complete {
        rows: usize,
        flagged: usize,
        report: String,
        url: Option<String>,
        percent: u8,
    },
    Error {
        message: String,
    },
}

/// Emits progress events to an optional listener, logging each step
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: Option<UnboundedSender<ProgressEvent>>,
}

impl Reporter {
    /// Reporter plus the single listening receiver
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Reporter that only logs
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            // Receiver gone just means nobody is listening anymore
            let _ = tx.send(event);
        }
    }

    pub fn step(&self, step: impl Into<String>, percent: u8) {
        let step = step.into();
        log::info!("[{:>3}%] {}", percent, step);
        self.send(ProgressEvent::Progress { step, percent });
    }

    pub fn complete(&self, rows: usize, flagged: usize, report: String, url: Option<String>) {
        log::info!("run complete: {} rows ({} flagged)", rows, flagged);
        self.send(ProgressEvent::Complete {
            rows,
            flagged,
            report,
            url,
            percent: 100,
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        log::error!("run failed: {}", message);
        self.send(ProgressEvent::Error { message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_emission_order() {
        let (reporter, mut rx) = Reporter::channel();
        reporter.step("reading orders", 5);
        reporter.step("converting", 60);
        reporter.complete(10, 1, "report.xlsx".into(), None);
        drop(reporter);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            ProgressEvent::Progress {
                step: "reading orders".into(),
                percent: 5
            }
        );
        assert!(matches!(events[2], ProgressEvent::Complete { percent: 100, .. }));
    }

    #[test]
    fn test_disabled_reporter_does_not_panic() {
        let reporter = Reporter::disabled();
        reporter.step("anything", 50);
        reporter.error("boom");
    }

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = ProgressEvent::Progress {
            step: "filtering closed orders".into(),
            percent: 30,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["percent"], 30);
    }
}
