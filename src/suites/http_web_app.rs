//! HTTP suite for the demo web app

use anyhow::{ensure, Result};
use serde_json::json;

use crate::config::ServerConfig;
use crate::demo::web_app::WebApp;
use crate::http::{HttpClient, HttpResponse};
use crate::models::{HttpSuite, OnReady, ServerStart};

pub fn suite(server: &ServerConfig) -> HttpSuite {
    let config = server.clone();
    let start = ServerStart::from_callback(move |on_ready: OnReady| {
        let app = WebApp::new(config.clone());
        tokio::spawn(async move {
            match app.start().await {
                Ok(handle) => on_ready.ready(handle),
                Err(err) => on_ready.failed(err),
            }
        });
    });

    let base_url = server.base_url();
    let get_root = base_url.clone();
    let post_root = base_url.clone();
    let unknown = base_url;

    HttpSuite::new("web_app", start)
        .case("Web App - Simple GET request status is 200", move || {
            let url = format!("{get_root}/");
            async move {
                let resp = HttpClient::new()?.get(&url).await?;
                expect_status(&resp, 200)
            }
        })
        .case("Web App - Simple POST request status is 200", move || {
            let url = format!("{post_root}/");
            async move {
                let resp = HttpClient::new()?.post_json(&url, &json!({})).await?;
                expect_status(&resp, 200)?;
                ensure!(
                    resp.has_content_type("application/json"),
                    "expected a JSON response, got {:?}",
                    resp.content_type
                );
                let body: serde_json::Value = resp.json()?;
                ensure!(
                    body.get("hello").is_some(),
                    "expected field \"hello\" in {body}"
                );
                Ok(())
            }
        })
        .case("Web App - GET to unknown URI leads to 404", move || {
            let url = format!("{unknown}/foo/bar");
            async move {
                let resp = HttpClient::new()?.get(&url).await?;
                expect_status(&resp, 404)
            }
        })
}

fn expect_status(resp: &HttpResponse, expected: u16) -> Result<()> {
    ensure!(
        resp.status_code == expected,
        "expected status {}, got {}",
        expected,
        resp.status_code
    );
    Ok(())
}
