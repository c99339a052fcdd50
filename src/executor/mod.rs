//! Test execution engine
//!
//! Sequential unit and HTTP suite executors and the runner that sequences them.

mod error;
mod http;
mod runner;
mod unit;

pub use runner::Runner;
