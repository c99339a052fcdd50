//! Result accumulation and persistence
//!
//! The report accumulator and the serializable run snapshot built from it.

mod report;
mod storage;

pub use report::{Report, Summary};
pub use storage::RunReport;
