//! Output formatting and progress reporting
//!
//! Provides the progress sink the runner emits to, and table/JSON renderings.

mod formatter;
mod sink;

pub use formatter::{OutputFormat, ResultFormatter};
pub use sink::{ConsoleSink, NullSink, ProgressSink};
