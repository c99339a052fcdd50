//! Suite and test case definitions
//!
//! Unit cases run synchronously and signal success by consuming a [`Completion`]
//! token. HTTP cases return a [`Deferred`] and share a server that is started
//! before the first case and stopped after the last one.

use anyhow::{anyhow, Result};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// A computation that settles later, either `Ok(())` or with the causing error
pub type Deferred = BoxFuture<'static, Result<()>>;

pub type UnitProcedure = Box<dyn Fn(Completion) -> Result<()> + Send + Sync>;
pub type HttpProcedure = Box<dyn Fn() -> Deferred + Send + Sync>;

/// Success signal handed to a unit procedure.
///
/// `signal` takes `self`, so a procedure can signal at most once.
#[derive(Debug)]
pub struct Completion {
    signaled: Arc<AtomicBool>,
}

impl Completion {
    pub(crate) fn new() -> (Self, CompletionFlag) {
        let signaled = Arc::new(AtomicBool::new(false));
        (
            Self {
                signaled: signaled.clone(),
            },
            CompletionFlag { signaled },
        )
    }

    /// Mark the case as passed
    pub fn signal(self) {
        self.signaled.store(true, Ordering::SeqCst);
    }
}

/// Executor-side view of a [`Completion`]
#[derive(Debug)]
pub(crate) struct CompletionFlag {
    signaled: Arc<AtomicBool>,
}

impl CompletionFlag {
    pub fn is_signaled(&self) -> bool {
        self.signaled.load(Ordering::SeqCst)
    }
}

/// A registered unit case
pub struct UnitCase {
    pub title: String,
    pub procedure: UnitProcedure,
}

impl UnitCase {
    pub fn new<F>(title: impl Into<String>, procedure: F) -> Self
    where
        F: Fn(Completion) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            procedure: Box::new(procedure),
        }
    }
}

impl fmt::Debug for UnitCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitCase").field("title", &self.title).finish()
    }
}

/// A registered HTTP case
pub struct HttpCase {
    pub title: String,
    pub procedure: HttpProcedure,
}

impl HttpCase {
    pub fn new<F, Fut>(title: impl Into<String>, procedure: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            title: title.into(),
            procedure: Box::new(move || procedure().boxed()),
        }
    }
}

impl fmt::Debug for HttpCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCase").field("title", &self.title).finish()
    }
}

/// Named, ordered collection of synchronous cases
#[derive(Debug)]
pub struct UnitSuite {
    pub name: String,
    pub cases: Vec<UnitCase>,
}

impl UnitSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Register a case
    pub fn case<F>(mut self, title: impl Into<String>, procedure: F) -> Self
    where
        F: Fn(Completion) -> Result<()> + Send + Sync + 'static,
    {
        self.cases.push(UnitCase::new(title, procedure));
        self
    }
}

/// A running server that an HTTP suite can tear down
pub trait ServerHandle: Send {
    /// Human-readable location of the server, used in logs
    fn describe(&self) -> String {
        "server".to_string()
    }

    /// Stop the server and wait until it no longer accepts connections
    fn stop(self: Box<Self>) -> BoxFuture<'static, Result<()>>;
}

type StartFn = Box<dyn Fn() -> BoxFuture<'static, Result<Box<dyn ServerHandle>>> + Send + Sync>;

/// Server starter for an HTTP suite
pub struct ServerStart {
    start: StartFn,
}

impl ServerStart {
    /// Starter whose future resolves once the server is ready
    pub fn new<F, Fut>(start: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Box<dyn ServerHandle>>> + Send + 'static,
    {
        Self {
            start: Box::new(move || start().boxed()),
        }
    }

    /// Adapt a starter that reports readiness through a callback
    pub fn from_callback<F>(start: F) -> Self
    where
        F: Fn(OnReady) + Send + Sync + 'static,
    {
        Self::new(move || {
            let (tx, rx) = oneshot::channel();
            start(OnReady { tx });
            async move {
                rx.await
                    .map_err(|_| anyhow!("server starter dropped its ready callback"))
                    .and_then(|started| started)
            }
        })
    }

    pub fn start(&self) -> BoxFuture<'static, Result<Box<dyn ServerHandle>>> {
        (self.start)()
    }
}

impl fmt::Debug for ServerStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerStart").finish_non_exhaustive()
    }
}

/// Ready callback handed to callback-style starters
pub struct OnReady {
    tx: oneshot::Sender<Result<Box<dyn ServerHandle>>>,
}

impl OnReady {
    pub fn ready(self, handle: impl ServerHandle + 'static) {
        // The receiver is gone only if the suite stopped waiting
        let _ = self.tx.send(Ok(Box::new(handle)));
    }

    /// Report that the server could not start
    pub fn failed(self, err: anyhow::Error) {
        let _ = self.tx.send(Err(err));
    }
}

/// Named collection of deferred cases sharing one server lifecycle
#[derive(Debug)]
pub struct HttpSuite {
    pub name: String,
    pub server_start: ServerStart,
    pub cases: Vec<HttpCase>,
    /// Bound on every suspension point of this suite; falls back to the runner default
    pub timeout: Option<Duration>,
}

impl HttpSuite {
    pub fn new(name: impl Into<String>, server_start: ServerStart) -> Self {
        Self {
            name: name.into(),
            server_start,
            cases: Vec::new(),
            timeout: None,
        }
    }

    /// Register a case
    pub fn case<F, Fut>(mut self, title: impl Into<String>, procedure: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.cases.push(HttpCase::new(title, procedure));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Explicitly registered suites, populated before a run
#[derive(Debug, Default)]
pub struct Registry {
    pub unit_suites: Vec<UnitSuite>,
    pub http_suites: Vec<HttpSuite>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit(mut self, suite: UnitSuite) -> Self {
        self.unit_suites.push(suite);
        self
    }

    pub fn add_http(mut self, suite: HttpSuite) -> Self {
        self.http_suites.push(suite);
        self
    }

    pub fn case_count(&self) -> usize {
        self.unit_suites.iter().map(|s| s.cases.len()).sum::<usize>()
            + self.http_suites.iter().map(|s| s.cases.len()).sum::<usize>()
    }
}
