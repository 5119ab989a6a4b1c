//! Withdrawal notifications.
//!
//! Sinks are a best-effort side channel: recording an event never fails the
//! withdrawal that produced it.

use crate::vaults::Withdrawal;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Receives a record for every successful withdrawal
pub trait EventSink {
    /// Record one withdrawal
    fn record(&mut self, event: &Withdrawal);
}

impl<E: EventSink + ?Sized> EventSink for &mut E {
    fn record(&mut self, event: &Withdrawal) {
        (**self).record(event);
    }
}

/// Logs withdrawals through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn record(&mut self, event: &Withdrawal) {
        log::info!("Withdrawal: amount={} when={}", event.amount, event.when);
    }
}

/// Keeps withdrawals in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Vec<Withdrawal>,
}

impl RecordingEventSink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first
    pub fn events(&self) -> &[Withdrawal] {
        &self.events
    }
}

impl EventSink for RecordingEventSink {
    fn record(&mut self, event: &Withdrawal) {
        self.events.push(*event);
    }
}

/// Appends withdrawals to a file, one JSON object per line
#[derive(Debug, Clone)]
pub struct JsonLinesEventSink {
    path: PathBuf,
}

impl JsonLinesEventSink {
    /// Sink appending to `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &Withdrawal) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

impl EventSink for JsonLinesEventSink {
    fn record(&mut self, event: &Withdrawal) {
        if let Err(e) = self.append(event) {
            log::warn!(
                "Failed to append withdrawal record to {}: {}",
                self.path.display(),
                e
            );
            LogEventSink.record(event);
        }
    }
}
