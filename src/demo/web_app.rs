//! Demo web app
//!
//! A hyper 1.x server with a single route:
//! - `GET /` returns an HTML greeting
//! - `POST /` returns `{"hello":"world"}`
//! - anything else is a 404
//!
//! [`WebApp::start`] resolves once the listener is bound, and the returned
//! [`WebAppHandle`] shuts the server down, including open connections.

use anyhow::{Context, Result};
use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::models::ServerHandle;

/// The demo web app, not yet listening
#[derive(Clone, Debug)]
pub struct WebApp {
    config: ServerConfig,
}

impl WebApp {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind the listener and start serving in the background
    pub async fn start(self) -> Result<WebAppHandle> {
        let host = self.config.host.as_str();
        let listener = TcpListener::bind((host, self.config.port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", host, self.config.port))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read bound address")?;

        info!("Server running at http://{}/", local_addr);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(serve(listener, shutdown_rx));

        Ok(WebAppHandle {
            local_addr,
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// A running web app
#[derive(Debug)]
pub struct WebAppHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl WebAppHandle {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.local_addr, path)
    }

    /// Stop accepting, drop open connections and wait for the server task
    pub async fn shutdown(self) -> Result<()> {
        // The task may already be gone; joining below reports why
        let _ = self.shutdown.send(());
        self.task.await.context("Web app task failed")?;
        info!("Server at {} stopped", self.local_addr);
        Ok(())
    }
}

impl ServerHandle for WebAppHandle {
    fn describe(&self) -> String {
        self.url("/")
    }

    fn stop(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
        (*self).shutdown().boxed()
    }
}

async fn serve(listener: TcpListener, mut shutdown: oneshot::Receiver<()>) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        debug!("Connection from {}", addr);
                        let io = TokioIo::new(stream);

                        connections.spawn(async move {
                            let service = service_fn(|req| async move {
                                Ok::<_, Infallible>(handle_request(&req))
                            });

                            if let Err(err) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                if !err.is_incomplete_message() {
                                    warn!("Error serving connection from {}: {}", addr, err);
                                }
                            }
                        });
                    }
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                    }
                }
            }
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = &mut shutdown => {
                debug!("Web app shutting down");
                break;
            }
        }
    }

    connections.shutdown().await;
}

/// Route a request. Paths are compared with leading and trailing slashes trimmed.
fn handle_request(req: &Request<Incoming>) -> Response<Full<Bytes>> {
    let trimmed_path = req.uri().path().trim_matches('/');
    if !trimmed_path.is_empty() {
        return not_found();
    }

    match *req.method() {
        Method::GET => make_response(StatusCode::OK, "text/html", "<h1>Hello World</h1>"),
        Method::POST => make_response(
            StatusCode::OK,
            "application/json",
            &serde_json::json!({ "hello": "world" }).to_string(),
        ),
        _ => not_found(),
    }
}

fn not_found() -> Response<Full<Bytes>> {
    make_response(StatusCode::NOT_FOUND, "text/html", "<h1>Page not found</h1>")
}

fn make_response(
    status: StatusCode,
    content_type: &'static str,
    body: &str,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
