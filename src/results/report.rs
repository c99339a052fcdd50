//! Report accumulator
//!
//! Append-only log of result records for one runner invocation, plus the
//! read-only views computed from it at the end of a run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ResultRecord, TestType};

/// Ordered log of every executed case
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Report {
    records: Vec<ResultRecord>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Records are never modified once appended.
    pub fn append(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Partition the log into passed and failed totals
    pub fn summarize(&self) -> Summary {
        let total_passed = self.records.iter().filter(|r| r.passed()).count();
        let total_failed = self.records.len() - total_passed;

        Summary {
            total_passed,
            total_failed,
            passed: total_failed == 0,
        }
    }

    /// Records that did not pass, in execution order
    pub fn failures(&self) -> Vec<&ResultRecord> {
        self.records.iter().filter(|r| !r.passed()).collect()
    }

    /// Per-suite totals in the order suites first appear in the log
    pub fn by_suite(&self) -> Vec<SuiteSummary> {
        let mut suites: Vec<SuiteSummary> = Vec::new();

        for record in &self.records {
            let index = match suites
                .iter()
                .position(|s| s.test_type == record.test_type && s.suite_name == record.suite_name)
            {
                Some(index) => index,
                None => {
                    suites.push(SuiteSummary {
                        test_type: record.test_type,
                        suite_name: record.suite_name.clone(),
                        passed: 0,
                        failed: 0,
                    });
                    suites.len() - 1
                }
            };

            if record.passed() {
                suites[index].passed += 1;
            } else {
                suites[index].failed += 1;
            }
        }

        suites
    }
}

/// Totals over the whole report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_passed: usize,
    pub total_failed: usize,
    /// True when nothing failed
    pub passed: bool,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.total_passed + self.total_failed
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            (self.total_passed as f64 / self.total() as f64) * 100.0
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Result: {}",
            self.total(),
            self.total_passed,
            self.total_failed,
            if self.passed { "passed" } else { "failed" }
        )
    }
}

/// Totals for a single suite
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub test_type: TestType,
    pub suite_name: String,
    pub passed: usize,
    pub failed: usize,
}
