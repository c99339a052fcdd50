//! Unit suite execution
//!
//! Runs synchronous completion-token cases inline on the calling thread.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::debug;

use crate::models::{CaseError, Completion, Outcome, ResultRecord, TestType, UnitCase, UnitSuite};
use crate::output::ProgressSink;
use crate::results::Report;
use crate::utils::timer::elapsed_ms;

/// Execute every case of `suite` in registration order, appending one record per case
pub fn run_unit_suite(suite: &UnitSuite, report: &mut Report, sink: &dyn ProgressSink) {
    sink.suite_started(TestType::Unit, &suite.name);
    debug!("Running unit suite '{}' ({} cases)", suite.name, suite.cases.len());

    for case in &suite.cases {
        let record = run_unit_case(&suite.name, case);
        debug!("{}", record);
        sink.case_finished(&record);
        report.append(record);
    }
}

/// Execute a single case and settle it into exactly one record
pub fn run_unit_case(suite_name: &str, case: &UnitCase) -> ResultRecord {
    let started = Instant::now();
    let (completion, signaled) = Completion::new();

    let result = panic::catch_unwind(AssertUnwindSafe(|| (case.procedure)(completion)));

    // An error wins even if the procedure signaled before failing
    let outcome = match result {
        Ok(Ok(())) if signaled.is_signaled() => Outcome::Passed,
        Ok(Ok(())) => Outcome::failed(CaseError::NotSignaled),
        Ok(Err(err)) => Outcome::failed(CaseError::raised(&err)),
        Err(payload) => Outcome::failed(CaseError::from_panic(payload)),
    };

    ResultRecord::new(TestType::Unit, suite_name, &case.title, outcome, elapsed_ms(started))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::NullSink;
    use anyhow::{bail, ensure};

    fn f() -> i32 {
        1
    }

    #[test]
    fn test_signaled_case_passes() {
        let case = UnitCase::new("returns 1", |done| {
            ensure!(f() == 1, "expected 1");
            done.signal();
            Ok(())
        });

        let record = run_unit_case("lib", &case);
        assert!(record.passed());
        assert_eq!(record.test_type, TestType::Unit);
        assert_eq!(record.suite_name, "lib");
    }

    #[test]
    fn test_raising_case_fails_with_error() {
        let case = UnitCase::new("raises", |_done| bail!("Lib - non-numeric input was given"));

        let record = run_unit_case("lib", &case);
        assert_eq!(
            record.outcome,
            Outcome::failed(CaseError::Raised(
                "Lib - non-numeric input was given".to_string()
            ))
        );
    }

    #[test]
    fn test_panicking_case_fails() {
        let case = UnitCase::new("panics", |_done| {
            assert_eq!(f(), 2, "mismatch");
            Ok(())
        });

        let record = run_unit_case("lib", &case);
        assert!(matches!(
            record.outcome,
            Outcome::Failed {
                error: CaseError::Panicked(_)
            }
        ));
    }

    #[test]
    fn test_silent_case_is_not_dropped() {
        let case = UnitCase::new("forgets to signal", |_done| Ok(()));

        let record = run_unit_case("lib", &case);
        assert_eq!(record.outcome, Outcome::failed(CaseError::NotSignaled));
    }

    #[test]
    fn test_error_after_signal_fails() {
        let case = UnitCase::new("signals then fails", |done| {
            done.signal();
            bail!("late failure")
        });

        assert!(!run_unit_case("lib", &case).passed());
    }

    #[test]
    fn test_suite_produces_one_record_per_case() {
        let suite = UnitSuite::new("mixed")
            .case("passes", |done| {
                done.signal();
                Ok(())
            })
            .case("raises", |_done| bail!("boom"))
            .case("silent", |_done| Ok(()))
            .case("passes again", |done| {
                done.signal();
                Ok(())
            });

        let mut report = Report::new();
        run_unit_suite(&suite, &mut report, &NullSink);

        assert_eq!(report.records().len(), 4);
        let titles: Vec<_> = report.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["passes", "raises", "silent", "passes again"]);

        let summary = report.summarize();
        assert_eq!(summary.total_passed, 2);
        assert_eq!(summary.total_failed, 2);
    }
}
