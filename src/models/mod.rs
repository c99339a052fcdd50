//! Data models for the suite runner
//!
//! Suites and cases as they are registered, and the records they produce.

mod suite;
mod test_result;

pub use suite::{
    Completion, HttpCase, HttpSuite, OnReady, Registry, ServerHandle, ServerStart, UnitCase,
    UnitSuite,
};
pub use test_result::{CaseError, Outcome, ResultRecord, TestType};
