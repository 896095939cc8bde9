//! Step sequencer: plays an ordered list of timed status lines into a log
//! sink, then fires a completion callback exactly once.
//!
//! Each step's effect (appending its line, optionally "typed" one character at
//! a time) runs to completion before the step's delay starts, and the next
//! step only begins once that delay has elapsed. Jitter stretches delays but
//! never reorders steps.
//!
//! The sink is best-effort. A missing sink or a failing write is logged and
//! counted in the [`SequenceReport`], but the sequence still runs to the end
//! and the callback still fires.

pub mod jitter;
pub mod scripts;
pub mod sink;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::SequencerConfig;

pub use jitter::{Jitter, NoJitter, UniformJitter};
pub use sink::{
    ChannelSink, LogEntry, LogLevel, LogSink, MemorySink, SinkError, SinkEvent, StdoutSink,
};

/// Styling hint for a step's log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepKind {
    #[default]
    Progress,
    Complete,
    Error,
}

/// One timed unit of simulated progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub message: String,
    /// Base delay after this step's effect, before jitter
    pub delay_ms: u64,
    pub kind: StepKind,
}

impl Step {
    pub fn new(message: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            message: message.into(),
            delay_ms,
            kind: StepKind::Progress,
        }
    }

    /// Mark this step as the final "complete" line of a script
    pub fn complete(mut self) -> Self {
        self.kind = StepKind::Complete;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    fn entry(&self, text: &str) -> LogEntry {
        LogEntry::info(text).with_kind(self.kind)
    }
}

/// Outcome of a finished sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceReport {
    pub run_id: Uuid,
    pub steps_run: usize,
    /// Number of step effects that could not be shown
    pub sink_failures: usize,
    pub elapsed: Duration,
}

/// Runs step sequences with jittered delays
#[derive(Clone)]
pub struct StepSequencer {
    jitter: Arc<dyn Jitter>,
    typing_speed: Duration,
}

impl StepSequencer {
    pub fn new(jitter: impl Jitter + 'static) -> Self {
        Self {
            jitter: Arc::new(jitter),
            typing_speed: Duration::ZERO,
        }
    }

    /// Build a sequencer from config with the given per-character typing speed
    pub fn from_config(config: &SequencerConfig, typing_speed_ms: u64) -> Self {
        Self::new(UniformJitter::new(config.max_jitter_ms))
            .with_typing_speed(Duration::from_millis(typing_speed_ms))
    }

    /// Type each message one character at a time at this speed.
    /// `Duration::ZERO` appends the whole line at once.
    pub fn with_typing_speed(mut self, typing_speed: Duration) -> Self {
        self.typing_speed = typing_speed;
        self
    }

    pub fn max_jitter(&self) -> Duration {
        self.jitter.max()
    }

    /// Run `steps` in order against `sink`, then call `on_complete` once.
    pub async fn run<F>(
        &self,
        steps: &[Step],
        sink: Option<&dyn LogSink>,
        on_complete: F,
    ) -> SequenceReport
    where
        F: FnOnce(&SequenceReport) + Send,
    {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sequence", %run_id, steps = steps.len());

        async move {
            let started = Instant::now();
            let mut sink_failures = 0;

            if sink.is_none() {
                tracing::warn!("Log view not mounted, continuing without visual log");
            }

            for (index, step) in steps.iter().enumerate() {
                tracing::debug!(index, message = %step.message, "Running step");

                if let Err(e) = self.emit(step, sink).await {
                    sink_failures += 1;
                    tracing::debug!(index, error = %e, "Step effect not shown");
                }

                tokio::time::sleep(step.delay() + self.jitter.sample()).await;
            }

            let report = SequenceReport {
                run_id,
                steps_run: steps.len(),
                sink_failures,
                elapsed: started.elapsed(),
            };

            if sink_failures > 0 && sink.is_some() {
                tracing::warn!(sink_failures, "Some steps could not be written to the log view");
            }
            tracing::info!(elapsed_ms = report.elapsed.as_millis() as u64, "Sequence complete");

            on_complete(&report);
            report
        }
        .instrument(span)
        .await
    }

    /// Perform a single step's visible effect
    async fn emit(&self, step: &Step, sink: Option<&dyn LogSink>) -> Result<(), SinkError> {
        let sink = sink.ok_or(SinkError::Unavailable)?;

        if self.typing_speed.is_zero() {
            sink.append(step.entry(&step.message))?;
        } else {
            sink.append(step.entry(""))?;
            for c in step.message.chars() {
                sink.type_char(c)?;
                tokio::time::sleep(self.typing_speed).await;
            }
        }

        sink.scroll_to_latest()
    }
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new(UniformJitter::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Sink that refuses every write
    struct BrokenSink;

    impl LogSink for BrokenSink {
        fn append(&self, _entry: LogEntry) -> Result<(), SinkError> {
            Err(SinkError::Unavailable)
        }

        fn type_char(&self, _c: char) -> Result<(), SinkError> {
            Err(SinkError::Unavailable)
        }
    }

    fn steps(delays: &[u64]) -> Vec<Step> {
        delays
            .iter()
            .enumerate()
            .map(|(i, d)| Step::new(format!("step {i}"), *d))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_run_in_order_then_callback() {
        let sink = MemorySink::new();
        let fired = AtomicUsize::new(0);
        let seen_at_completion = Mutex::new(Vec::new());

        let report = StepSequencer::new(NoJitter)
            .run(&steps(&[10, 20, 30]), Some(&sink), |_| {
                fired.fetch_add(1, Ordering::SeqCst);
                *seen_at_completion.lock().unwrap() = sink.texts();
            })
            .await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(
            *seen_at_completion.lock().unwrap(),
            vec!["step 0", "step 1", "step 2"]
        );
        assert_eq!(report.steps_run, 3);
        assert_eq!(report.sink_failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_sequence_completes_without_effects() {
        let sink = MemorySink::new();
        let fired = AtomicUsize::new(0);

        let report = StepSequencer::default()
            .run(&[], Some(&sink), |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(sink.entries().is_empty());
        assert_eq!(report.elapsed, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_builds_line_character_by_character() {
        let sink = MemorySink::new();
        let sequencer = StepSequencer::new(NoJitter).with_typing_speed(Duration::from_millis(10));

        let report = sequencer
            .run(&[Step::new("abc", 100)], Some(&sink), |_| {})
            .await;

        assert_eq!(sink.texts(), vec!["abc"]);
        // three characters typed, then the step delay
        assert_eq!(report.elapsed, Duration::from_millis(130));
    }

    #[tokio::test(start_paused = true)]
    async fn test_broken_sink_still_completes() {
        let fired = AtomicUsize::new(0);

        let report = StepSequencer::new(NoJitter)
            .run(&steps(&[5, 5, 5]), Some(&BrokenSink), |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(report.sink_failures, 3);
        assert_eq!(report.elapsed, Duration::from_millis(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_step_keeps_its_kind() {
        let sink = MemorySink::new();
        StepSequencer::new(NoJitter)
            .run(&[Step::new("done", 0).complete()], Some(&sink), |_| {})
            .await;

        assert_eq!(sink.entries()[0].kind, StepKind::Complete);
    }

    #[test]
    fn test_from_config_uses_configured_jitter() {
        let config = SequencerConfig {
            max_jitter_ms: 42,
            ..SequencerConfig::default()
        };
        let sequencer = StepSequencer::from_config(&config, 0);
        assert_eq!(sequencer.max_jitter(), Duration::from_millis(42));
    }
}
