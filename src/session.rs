//! Run status for actions that must not overlap.
//!
//! Each sequencer-driven action (the build, the assessment, the title slide)
//! owns one [`SessionState`]. Starting while a run is in flight is rejected,
//! which is what keeps the trigger control "disabled" in the UI.

use chrono::{DateTime, Local};
use thiserror::Error;

/// Lifecycle of a guarded action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Complete,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0} is already running")]
    AlreadyRunning(&'static str),

    #[error("{0} has already been started")]
    AlreadyStarted(&'static str),

    #[error("{0} is not running")]
    NotRunning(&'static str),
}

/// Explicit run state for one guarded action
#[derive(Debug, Clone)]
pub struct SessionState {
    name: &'static str,
    status: RunStatus,
    runs: u32,
    started_at: Option<DateTime<Local>>,
}

impl SessionState {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            status: RunStatus::Idle,
            runs: 0,
            started_at: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Number of runs started so far
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    /// Move to `Running`. Allowed from `Idle` and from `Complete` (re-run).
    pub fn begin(&mut self) -> Result<(), SessionError> {
        if self.status == RunStatus::Running {
            tracing::info!(action = self.name, "Ignoring start while already running");
            return Err(SessionError::AlreadyRunning(self.name));
        }
        self.status = RunStatus::Running;
        self.runs += 1;
        self.started_at = Some(Local::now());
        Ok(())
    }

    /// Move to `Running` only from `Idle`; used for one-shot actions.
    pub fn begin_once(&mut self) -> Result<(), SessionError> {
        if self.status != RunStatus::Idle {
            tracing::info!(action = self.name, "Already initialized, ignoring");
            return Err(SessionError::AlreadyStarted(self.name));
        }
        self.begin()
    }

    /// Move from `Running` to `Complete`
    pub fn finish(&mut self) -> Result<(), SessionError> {
        if self.status != RunStatus::Running {
            return Err(SessionError::NotRunning(self.name));
        }
        self.status = RunStatus::Complete;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = SessionState::new("build");
        assert_eq!(session.status(), RunStatus::Idle);
        assert_eq!(session.runs(), 0);
        assert!(session.started_at().is_none());
    }

    #[test]
    fn test_begin_rejects_reentry_while_running() {
        let mut session = SessionState::new("build");
        session.begin().unwrap();

        assert_eq!(session.begin(), Err(SessionError::AlreadyRunning("build")));
        assert_eq!(session.runs(), 1);
        assert!(session.is_running());
    }

    #[test]
    fn test_rerun_allowed_after_complete() {
        let mut session = SessionState::new("assessment");
        session.begin().unwrap();
        session.finish().unwrap();
        assert_eq!(session.status(), RunStatus::Complete);

        session.begin().unwrap();
        assert_eq!(session.runs(), 2);
    }

    #[test]
    fn test_begin_once_rejects_second_start() {
        let mut session = SessionState::new("demo");
        session.begin_once().unwrap();
        session.finish().unwrap();

        assert_eq!(
            session.begin_once(),
            Err(SessionError::AlreadyStarted("demo"))
        );
    }

    #[test]
    fn test_finish_requires_running() {
        let mut session = SessionState::new("build");
        assert_eq!(session.finish(), Err(SessionError::NotRunning("build")));
    }

    #[test]
    fn test_error_messages_name_the_action() {
        assert_eq!(
            SessionError::AlreadyRunning("build").to_string(),
            "build is already running"
        );
    }
}
