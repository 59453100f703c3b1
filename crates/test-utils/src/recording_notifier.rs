use std::sync::{Arc, Mutex};

use harness_watch::notify::{FAILURE_MARKER, Notifier};

/// What the watcher asked the notifier to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Progress(String),
    Failure(String),
}

/// A notifier that records every call instead of writing to stdout.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Failure(detail) => Some(detail),
                Notification::Progress(_) => None,
            })
            .collect()
    }

    pub fn progress_lines(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Progress(line) => Some(line),
                Notification::Failure(_) => None,
            })
            .collect()
    }

    /// Output as the stdout notifier would have written it, line by line.
    pub fn rendered_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for n in self.notifications() {
            match n {
                Notification::Progress(line) => lines.push(line),
                Notification::Failure(detail) => {
                    lines.push(FAILURE_MARKER.to_string());
                    lines.push(detail);
                }
            }
        }
        lines
    }
}

impl Notifier for RecordingNotifier {
    fn progress(&self, line: &str) {
        self.seen
            .lock()
            .unwrap()
            .push(Notification::Progress(line.to_string()));
    }

    fn failure(&self, detail: &str) {
        self.seen
            .lock()
            .unwrap()
            .push(Notification::Failure(detail.to_string()));
    }
}
