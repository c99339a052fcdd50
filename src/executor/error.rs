//! Runner-level errors
//!
//! Case failures never surface here; they are recorded in the report. These are
//! the suite lifecycle and orchestration failures that abort a run.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::runner::RunnerState;

/// Suspension point of an HTTP suite's server lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecyclePhase {
    ServerStart,
    ServerStop,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecyclePhase::ServerStart => write!(f, "server start"),
            LifecyclePhase::ServerStop => write!(f, "server stop"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to start server for suite '{suite}': {source}")]
    ServerStart {
        suite: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to stop server for suite '{suite}': {source}")]
    ServerStop {
        suite: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Suite '{suite}' timed out after {}ms during {phase}", .after.as_millis())]
    SuiteTimedOut {
        suite: String,
        phase: LifecyclePhase,
        after: Duration,
    },

    #[error("Invalid runner transition from {from} to {to}")]
    InvalidTransition { from: RunnerState, to: RunnerState },
}
