//! HTTP client module for HTTP test cases

mod client;

pub use client::{HttpClient, HttpResponse};
