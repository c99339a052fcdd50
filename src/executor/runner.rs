//! Test execution runner
//!
//! Drives every registered unit suite, then every HTTP suite, then summarizes.
//! `run` consumes the runner, so a registry is executed exactly once.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use super::error::RunnerError;
use super::http::run_http_suite;
use super::unit::run_unit_suite;
use crate::models::{Registry, TestType};
use crate::output::{NullSink, ProgressSink};
use crate::results::{Report, RunReport, Summary};
use crate::utils::timer::{PhaseDurations, PhaseTimer};

/// Lifecycle of a single runner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    RunningUnits,
    RunningHttp,
    Summarizing,
    Terminated,
}

impl RunnerState {
    /// The only state reachable from `self`
    pub fn next(self) -> Option<RunnerState> {
        match self {
            RunnerState::Idle => Some(RunnerState::RunningUnits),
            RunnerState::RunningUnits => Some(RunnerState::RunningHttp),
            RunnerState::RunningHttp => Some(RunnerState::Summarizing),
            RunnerState::Summarizing => Some(RunnerState::Terminated),
            RunnerState::Terminated => None,
        }
    }
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunnerState::Idle => "idle",
            RunnerState::RunningUnits => "running-units",
            RunnerState::RunningHttp => "running-http",
            RunnerState::Summarizing => "summarizing",
            RunnerState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Everything a finished run produced
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub report: Report,
    pub summary: Summary,
    pub phases: PhaseDurations,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn to_run_report(&self) -> RunReport {
        RunReport::new(&self.report, self.phases, self.started_at, self.finished_at)
    }
}

/// Orchestrates one run over a registry
pub struct Runner {
    registry: Registry,
    sink: Box<dyn ProgressSink>,
    default_timeout: Option<Duration>,
    state: RunnerState,
    report: Report,
}

impl Runner {
    /// Create a runner that reports nowhere and never times out
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            sink: Box::new(NullSink),
            default_timeout: None,
            state: RunnerState::Idle,
            report: Report::new(),
        }
    }

    pub fn with_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Bound for HTTP suites that do not set their own
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    fn advance(&mut self, to: RunnerState) -> Result<(), RunnerError> {
        if self.state.next() != Some(to) {
            return Err(RunnerError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        debug!("Runner state: {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }

    /// Run all registered suites and summarize.
    ///
    /// Case failures end up in the report; lifecycle failures abort the run.
    pub async fn run(mut self) -> Result<RunOutcome, RunnerError> {
        let started_at = Utc::now();
        let mut timer = PhaseTimer::start();
        info!(
            "Starting run: {} unit suites, {} HTTP suites, {} cases",
            self.registry.unit_suites.len(),
            self.registry.http_suites.len(),
            self.registry.case_count()
        );

        self.advance(RunnerState::RunningUnits)?;
        self.sink.phase_started(TestType::Unit);
        for suite in &self.registry.unit_suites {
            run_unit_suite(suite, &mut self.report, self.sink.as_ref());
        }
        debug!("Unit phase took {}ms", timer.finish(TestType::Unit));

        self.advance(RunnerState::RunningHttp)?;
        self.sink.phase_started(TestType::Http);
        for suite in &self.registry.http_suites {
            run_http_suite(
                suite,
                &mut self.report,
                self.sink.as_ref(),
                self.default_timeout,
            )
            .await?;
        }
        debug!("HTTP phase took {}ms", timer.finish(TestType::Http));

        self.advance(RunnerState::Summarizing)?;
        let summary = self.report.summarize();
        let phases = timer.durations();
        self.sink.run_finished(&self.report, &summary, &phases);

        self.advance(RunnerState::Terminated)?;
        info!(
            "Run finished - Pass: {}/{} ({})",
            summary.total_passed,
            summary.total(),
            phases
        );

        Ok(RunOutcome {
            report: self.report,
            summary,
            phases,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HttpSuite, ResultRecord, ServerHandle, ServerStart, UnitSuite};
    use anyhow::{bail, ensure, Result};
    use futures::future::{BoxFuture, FutureExt};
    use std::sync::{Arc, Mutex};

    struct NoopServer;

    impl ServerHandle for NoopServer {
        fn stop(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
            async { Ok(()) }.boxed()
        }
    }

    fn noop_start() -> ServerStart {
        ServerStart::new(|| async { Ok(Box::new(NoopServer) as Box<dyn ServerHandle>) })
    }

    /// Records the order of sink events
    #[derive(Clone, Default)]
    struct RecordingSink {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl ProgressSink for RecordingSink {
        fn phase_started(&self, test_type: TestType) {
            self.events.lock().unwrap().push(format!("phase:{test_type}"));
        }

        fn case_finished(&self, record: &ResultRecord) {
            self.events.lock().unwrap().push(format!("case:{}", record.title));
        }

        fn run_finished(&self, _report: &Report, summary: &Summary, _phases: &PhaseDurations) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{}", summary.total()));
        }
    }

    fn passing(title: &'static str) -> impl Fn(crate::models::Completion) -> Result<()> {
        move |done| {
            ensure!(!title.is_empty());
            done.signal();
            Ok(())
        }
    }

    #[test]
    fn test_state_transitions_are_sequential() {
        let mut runner = Runner::new(Registry::new());
        assert_eq!(runner.state, RunnerState::Idle);

        assert!(runner.advance(RunnerState::RunningHttp).is_err());
        runner.advance(RunnerState::RunningUnits).unwrap();
        runner.advance(RunnerState::RunningHttp).unwrap();
        runner.advance(RunnerState::Summarizing).unwrap();
        runner.advance(RunnerState::Terminated).unwrap();
        assert!(RunnerState::Terminated.next().is_none());
    }

    #[tokio::test]
    async fn test_end_to_end_totals() {
        let registry = Registry::new()
            .add_unit(
                UnitSuite::new("lib")
                    .case("one", passing("one"))
                    .case("two", passing("two"))
                    .case("three", passing("three")),
            )
            .add_http(
                HttpSuite::new("web_app", noop_start())
                    .case("passes", || async { Ok(()) })
                    .case("fails", || async { bail!("expected 200, got 404") }),
            );

        let outcome = Runner::new(registry).run().await.unwrap();

        assert_eq!(outcome.summary.total_passed, 4);
        assert_eq!(outcome.summary.total_failed, 1);
        assert!(!outcome.summary.passed);
        assert_eq!(outcome.report.records().len(), 5);
    }

    #[tokio::test]
    async fn test_phase_durations_reach_run_report() {
        let registry = Registry::new().add_http(
            HttpSuite::new("web", noop_start()).case("slow", || async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok(())
            }),
        );

        let outcome = Runner::new(registry).run().await.unwrap();

        assert!(outcome.phases.http_ms >= 30);
        assert_eq!(outcome.to_run_report().phases, outcome.phases);
    }

    #[tokio::test]
    async fn test_units_complete_before_http() {
        let sink = RecordingSink::default();
        let registry = Registry::new()
            .add_http(HttpSuite::new("web", noop_start()).case("h1", || async { Ok(()) }))
            .add_unit(UnitSuite::new("lib").case("u1", passing("u1")));

        Runner::new(registry)
            .with_sink(sink.clone())
            .run()
            .await
            .unwrap();

        let events = sink.events.lock().unwrap().clone();
        assert_eq!(
            events,
            ["phase:unit", "case:u1", "phase:http", "case:h1", "done:2"]
        );
    }

    #[tokio::test]
    async fn test_lifecycle_failure_aborts_run() {
        let registry = Registry::new().add_http(HttpSuite::new(
            "web",
            ServerStart::new(|| async {
                Err::<Box<dyn ServerHandle>, _>(anyhow::anyhow!("bind failed"))
            }),
        ));

        let err = Runner::new(registry).run().await.unwrap_err();
        assert!(matches!(err, RunnerError::ServerStart { .. }));
    }

    #[tokio::test]
    async fn test_run_report_from_outcome() {
        let registry = Registry::new().add_unit(UnitSuite::new("lib").case("u", passing("u")));
        let outcome = Runner::new(registry).run().await.unwrap();
        let run = outcome.to_run_report();

        assert_eq!(run.summary, outcome.summary);
        assert!(run.finished_at >= run.started_at);
    }
}
