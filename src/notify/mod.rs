// src/notify/mod.rs

//! Operator-facing output.
//!
//! Progress and failure lines go to stdout through a [`Notifier`] so a CI
//! log shows them next to the rest of the step's output. Diagnostic logging
//! stays on stderr via `tracing`.

use std::io::Write;

/// Marker line written before every failure report.
///
/// Log scrapers key on this exact text.
pub const FAILURE_MARKER: &str = "polling response error:";

/// Sink for human-readable watch output.
pub trait Notifier: Send + Sync {
    /// A status change or other informational line.
    fn progress(&self, line: &str);

    /// A failure report. Implementations must make it distinguishable from
    /// progress output (the stdout notifier prefixes [`FAILURE_MARKER`]).
    fn failure(&self, detail: &str);
}

/// Notifier writing to the process stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn progress(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }

    fn failure(&self, detail: &str) {
        // One locked write so the marker and detail never interleave with
        // another watch sharing the process.
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{FAILURE_MARKER}");
        let _ = writeln!(out, "{detail}");
    }
}
