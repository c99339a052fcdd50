//! HTTP suite execution
//!
//! Starts the suite's server, awaits each deferred case strictly in sequence,
//! then stops the server once every case has settled.

use futures::FutureExt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::error::{LifecyclePhase, RunnerError};
use crate::models::{CaseError, HttpCase, HttpSuite, Outcome, ResultRecord, TestType};
use crate::output::ProgressSink;
use crate::results::Report;
use crate::utils::timer::elapsed_ms;

/// Run `suite` against a fresh server. Case failures are recorded; only
/// server lifecycle failures are returned.
pub async fn run_http_suite(
    suite: &HttpSuite,
    report: &mut Report,
    sink: &dyn ProgressSink,
    default_timeout: Option<Duration>,
) -> Result<(), RunnerError> {
    let timeout = suite.timeout.or(default_timeout);
    sink.suite_started(TestType::Http, &suite.name);

    let handle = match bounded(timeout, suite.server_start.start()).await {
        Some(Ok(handle)) => handle,
        Some(Err(source)) => {
            return Err(RunnerError::ServerStart {
                suite: suite.name.clone(),
                source,
            })
        }
        None => return Err(timed_out(suite, LifecyclePhase::ServerStart, timeout)),
    };
    info!("Server for suite '{}' ready at {}", suite.name, handle.describe());

    for case in &suite.cases {
        let record = run_http_case(&suite.name, case, timeout).await;
        debug!("{}", record);
        sink.case_finished(&record);
        report.append(record);
    }

    debug!("Stopping server for suite '{}'", suite.name);
    match bounded(timeout, handle.stop()).await {
        Some(Ok(())) => Ok(()),
        Some(Err(source)) => Err(RunnerError::ServerStop {
            suite: suite.name.clone(),
            source,
        }),
        None => Err(timed_out(suite, LifecyclePhase::ServerStop, timeout)),
    }
}

/// Await a single deferred case and settle it into exactly one record
pub async fn run_http_case(
    suite_name: &str,
    case: &HttpCase,
    timeout: Option<Duration>,
) -> ResultRecord {
    let started = Instant::now();

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| (case.procedure)())) {
        Err(payload) => Outcome::failed(CaseError::from_panic(payload)),
        Ok(deferred) => match bounded(timeout, AssertUnwindSafe(deferred).catch_unwind()).await {
            Some(Ok(Ok(()))) => Outcome::Passed,
            Some(Ok(Err(err))) => Outcome::failed(CaseError::raised(&err)),
            Some(Err(payload)) => Outcome::failed(CaseError::from_panic(payload)),
            None => Outcome::TimedOut {
                after_ms: timeout.map(|t| t.as_millis() as u64).unwrap_or_default(),
            },
        },
    };

    ResultRecord::new(TestType::Http, suite_name, &case.title, outcome, elapsed_ms(started))
}

/// Await `fut`, giving up after `limit` when one is set
async fn bounded<F: Future>(limit: Option<Duration>, fut: F) -> Option<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    }
}

fn timed_out(suite: &HttpSuite, phase: LifecyclePhase, timeout: Option<Duration>) -> RunnerError {
    RunnerError::SuiteTimedOut {
        suite: suite.name.clone(),
        phase,
        after: timeout.unwrap_or_default(),
    }
}
