//! Demo code exercised by the registered suites
//!
//! A toy library and a single-route web app. Neither knows about the runner.

pub mod library;
pub mod web_app;
