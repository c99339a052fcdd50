//! Test result models
//!
//! Defines result records and the tagged outcome every executed case settles into.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use thiserror::Error;

/// Kind of suite a record was produced by
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Unit,
    Http,
}

impl TestType {
    pub fn name(&self) -> &'static str {
        match self {
            TestType::Unit => "unit",
            TestType::Http => "http",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a case failed
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum CaseError {
    /// The procedure returned an error (assertion or otherwise)
    #[error("{0}")]
    Raised(String),

    /// The procedure panicked
    #[error("panicked: {0}")]
    Panicked(String),

    /// A unit procedure returned without consuming its completion token
    #[error("test did not signal completion")]
    NotSignaled,
}

impl CaseError {
    pub fn raised(err: &anyhow::Error) -> Self {
        CaseError::Raised(format!("{err:#}"))
    }

    /// Convert a `catch_unwind` payload into a failure
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        CaseError::Panicked(message)
    }
}

/// Settled outcome of a single case. There is no fourth, silent state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed { error: CaseError },
    TimedOut { after_ms: u64 },
}

impl Outcome {
    pub fn failed(error: CaseError) -> Self {
        Outcome::Failed { error }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Outcome::Passed => "✓",
            Outcome::Failed { .. } => "✗",
            Outcome::TimedOut { .. } => "⧗",
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            Outcome::Passed => None,
            Outcome::Failed { error } => Some(error.to_string()),
            Outcome::TimedOut { after_ms } => Some(format!("timed out after {after_ms}ms")),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "PASS"),
            Outcome::Failed { .. } => write!(f, "FAIL"),
            Outcome::TimedOut { .. } => write!(f, "TIMEOUT"),
        }
    }
}

/// One record per executed case; never mutated after creation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultRecord {
    pub test_type: TestType,
    pub suite_name: String,
    pub title: String,
    pub outcome: Outcome,
    pub duration_ms: u64,
}

impl ResultRecord {
    pub fn new(
        test_type: TestType,
        suite_name: impl Into<String>,
        title: impl Into<String>,
        outcome: Outcome,
        duration_ms: u64,
    ) -> Self {
        Self {
            test_type,
            suite_name: suite_name.into(),
            title: title.into(),
            outcome,
            duration_ms,
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_passed()
    }

    pub fn error(&self) -> Option<String> {
        self.outcome.error_message()
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {} [{}ms]",
            self.outcome.symbol(),
            self.suite_name,
            self.title,
            self.duration_ms
        )?;
        if let Some(msg) = self.error() {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_passed() {
        let record = ResultRecord::new(TestType::Unit, "lib", "returns 1", Outcome::Passed, 2);
        assert!(record.passed());
        assert!(record.error().is_none());
    }

    #[test]
    fn test_record_failed_carries_error() {
        let err = anyhow::anyhow!("expected 1, got 2");
        let record = ResultRecord::new(
            TestType::Http,
            "web_app",
            "GET /",
            Outcome::failed(CaseError::raised(&err)),
            10,
        );
        assert!(!record.passed());
        assert_eq!(record.error().as_deref(), Some("expected 1, got 2"));
    }

    #[test]
    fn test_panic_payload_conversion() {
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(
            CaseError::from_panic(payload),
            CaseError::Panicked("boom".to_string())
        );

        let payload = std::panic::catch_unwind(|| panic!("code {}", 7)).unwrap_err();
        assert_eq!(
            CaseError::from_panic(payload),
            CaseError::Panicked("code 7".to_string())
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(Outcome::failed(CaseError::NotSignaled)).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"]["kind"], "not_signaled");

        let json = serde_json::to_value(Outcome::TimedOut { after_ms: 50 }).unwrap();
        assert_eq!(json["status"], "timed_out");
        assert_eq!(json["after_ms"], 50);
    }

    #[test]
    fn test_timed_out_message() {
        let outcome = Outcome::TimedOut { after_ms: 1500 };
        assert_eq!(outcome.error_message().as_deref(), Some("timed out after 1500ms"));
        assert_eq!(outcome.to_string(), "TIMEOUT");
    }
}
