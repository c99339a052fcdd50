//! Progress sinks
//!
//! The runner reports banners and settled cases here instead of printing.

use crate::models::{ResultRecord, TestType};
use crate::results::{Report, Summary};
use crate::utils::timer::PhaseDurations;

use super::formatter::ResultFormatter;

/// Receives progress events during a run. All methods default to no-ops.
pub trait ProgressSink: Send + Sync {
    /// A phase (all unit suites, or all HTTP suites) is starting
    fn phase_started(&self, _test_type: TestType) {}

    fn suite_started(&self, _test_type: TestType, _suite_name: &str) {}

    fn case_finished(&self, _record: &ResultRecord) {}

    fn run_finished(&self, _report: &Report, _summary: &Summary, _phases: &PhaseDurations) {}
}

/// Discards every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {}

/// Prints banners and colored case lines to stdout
#[derive(Clone, Debug, Default)]
pub struct ConsoleSink {
    formatter: ResultFormatter,
}

impl ConsoleSink {
    pub fn new(formatter: ResultFormatter) -> Self {
        Self { formatter }
    }
}

impl ProgressSink for ConsoleSink {
    fn phase_started(&self, test_type: TestType) {
        println!("{}", self.formatter.phase_title(test_type));
    }

    fn suite_started(&self, test_type: TestType, suite_name: &str) {
        println!("{}", self.formatter.suite_title(test_type, suite_name));
    }

    fn case_finished(&self, record: &ResultRecord) {
        println!("{}", self.formatter.format_record(record));
        if let Some(error) = record.error() {
            println!("    {error}");
        }
    }

    fn run_finished(&self, report: &Report, summary: &Summary, phases: &PhaseDurations) {
        println!("{}", self.formatter.format_summary(report, summary, phases));
    }
}
