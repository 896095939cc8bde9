//! Log sinks that receive the sequencer's progress lines.
//!
//! A sink is best-effort: every method may fail, and the sequencer treats a
//! failure as "this line was not shown" rather than as a reason to stop.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use super::StepKind;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Info,
    Error,
}

/// A single line in an append-only log view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub level: LogLevel,
    pub kind: StepKind,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: LogLevel::Info,
            kind: StepKind::Progress,
            timestamp: Local::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            kind: StepKind::Error,
            ..Self::info(text)
        }
    }

    pub fn with_kind(mut self, kind: StepKind) -> Self {
        self.kind = kind;
        if kind == StepKind::Error {
            self.level = LogLevel::Error;
        }
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }
}

/// Errors a log sink can report
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("log view is not mounted")]
    Unavailable,

    #[error("log sink closed: {0}")]
    Closed(String),

    #[error("failed to write log line: {0}")]
    Write(String),
}

/// An append-only log view.
pub trait LogSink: Send + Sync {
    /// Append a new line
    fn append(&self, entry: LogEntry) -> Result<(), SinkError>;

    /// Extend the most recently appended line by one character
    fn type_char(&self, c: char) -> Result<(), SinkError>;

    /// Bring the latest line into view
    fn scroll_to_latest(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Events emitted by a [`ChannelSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Append(LogEntry),
    TypeChar(char),
    ScrollToLatest,
}

/// Forwards sink calls over an unbounded channel to the UI loop.
///
/// `wrap` lifts a [`SinkEvent`] into the receiver's message type, so several
/// sinks can share one channel and still be told apart.
pub struct ChannelSink<T> {
    tx: UnboundedSender<T>,
    wrap: fn(SinkEvent) -> T,
}

impl<T> ChannelSink<T> {
    pub fn new(tx: UnboundedSender<T>, wrap: fn(SinkEvent) -> T) -> Self {
        Self { tx, wrap }
    }

    fn send(&self, event: SinkEvent) -> Result<(), SinkError> {
        self.tx
            .send((self.wrap)(event))
            .map_err(|_| SinkError::Closed("receiver dropped".to_string()))
    }
}

impl<T: Send> LogSink for ChannelSink<T> {
    fn append(&self, entry: LogEntry) -> Result<(), SinkError> {
        self.send(SinkEvent::Append(entry))
    }

    fn type_char(&self, c: char) -> Result<(), SinkError> {
        self.send(SinkEvent::TypeChar(c))
    }

    fn scroll_to_latest(&self) -> Result<(), SinkError> {
        self.send(SinkEvent::ScrollToLatest)
    }
}

/// Prints lines to stdout for headless playback
pub struct StdoutSink {
    line_open: Mutex<bool>,
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            line_open: Mutex::new(false),
        }
    }

    /// Terminate the current line, if any
    pub fn finish(&self) -> Result<(), SinkError> {
        let mut open = self
            .line_open
            .lock()
            .map_err(|e| SinkError::Write(e.to_string()))?;
        if *open {
            writeln!(io::stdout()).map_err(|e| SinkError::Write(e.to_string()))?;
            *open = false;
        }
        Ok(())
    }
}

impl LogSink for StdoutSink {
    fn append(&self, entry: LogEntry) -> Result<(), SinkError> {
        let mut open = self
            .line_open
            .lock()
            .map_err(|e| SinkError::Write(e.to_string()))?;
        let mut out = io::stdout().lock();
        if *open {
            writeln!(out).map_err(|e| SinkError::Write(e.to_string()))?;
        }
        let marker = match entry.kind {
            StepKind::Progress => "•",
            StepKind::Complete => "✓",
            StepKind::Error => "✗",
        };
        write!(
            out,
            "[{}] {} {}",
            entry.timestamp.format("%H:%M:%S"),
            marker,
            entry.text
        )
        .map_err(|e| SinkError::Write(e.to_string()))?;
        out.flush().map_err(|e| SinkError::Write(e.to_string()))?;
        *open = true;
        Ok(())
    }

    fn type_char(&self, c: char) -> Result<(), SinkError> {
        let mut out = io::stdout().lock();
        write!(out, "{c}").map_err(|e| SinkError::Write(e.to_string()))?;
        out.flush().map_err(|e| SinkError::Write(e.to_string()))
    }
}

/// In-memory sink, mostly useful for tests and snapshots
#[derive(Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.text).collect()
    }
}

impl LogSink for MemorySink {
    fn append(&self, entry: LogEntry) -> Result<(), SinkError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SinkError::Write(e.to_string()))?;
        entries.push(entry);
        Ok(())
    }

    fn type_char(&self, c: char) -> Result<(), SinkError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SinkError::Write(e.to_string()))?;
        match entries.last_mut() {
            Some(last) => {
                last.text.push(c);
                Ok(())
            }
            None => Err(SinkError::Unavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum Msg {
        Build(SinkEvent),
    }

    #[test]
    fn test_error_entry_is_error_level() {
        let entry = LogEntry::error("boom");
        assert!(entry.is_error());
        assert_eq!(entry.kind, StepKind::Error);
    }

    #[test]
    fn test_with_kind_error_promotes_level() {
        let entry = LogEntry::info("x").with_kind(StepKind::Error);
        assert_eq!(entry.level, LogLevel::Error);

        let entry = LogEntry::info("x").with_kind(StepKind::Complete);
        assert_eq!(entry.level, LogLevel::Info);
    }

    #[test]
    fn test_channel_sink_wraps_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx, Msg::Build);

        sink.type_char('a').unwrap();
        sink.scroll_to_latest().unwrap();

        assert_eq!(rx.try_recv().unwrap(), Msg::Build(SinkEvent::TypeChar('a')));
        assert_eq!(
            rx.try_recv().unwrap(),
            Msg::Build(SinkEvent::ScrollToLatest)
        );
    }

    #[test]
    fn test_channel_sink_reports_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx, Msg::Build);
        drop(rx);

        let err = sink.append(LogEntry::info("lost")).unwrap_err();
        assert!(matches!(err, SinkError::Closed(_)));
    }

    #[test]
    fn test_memory_sink_types_into_last_line() {
        let sink = MemorySink::new();
        sink.append(LogEntry::info("")).unwrap();
        for c in "hi".chars() {
            sink.type_char(c).unwrap();
        }
        assert_eq!(sink.texts(), vec!["hi".to_string()]);
    }

    #[test]
    fn test_memory_sink_type_without_line_is_unavailable() {
        let sink = MemorySink::new();
        assert_eq!(sink.type_char('x'), Err(SinkError::Unavailable));
    }
}
