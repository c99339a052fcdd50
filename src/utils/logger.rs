//! Logging setup
//!
//! Installs the `tracing` subscriber. Logs go to stderr so report output on
//! stdout stays machine-readable.

use tracing::Level;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: Level = Level::WARN;

/// Pick the level: `--verbose` wins, then the configured name, then `warn`.
/// Unknown names fall back to the default.
pub fn resolve_level(configured: Option<&str>, verbose: bool) -> Level {
    if verbose {
        return Level::DEBUG;
    }
    configured
        .and_then(|name| name.trim().parse().ok())
        .unwrap_or(DEFAULT_LEVEL)
}

/// Initialize the logger. `RUST_LOG` takes precedence when set.
pub fn init_logger(level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("suite_runner={}", level.as_str().to_ascii_lowercase()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_level() {
        assert_eq!(resolve_level(Some("info"), false), Level::INFO);
        assert_eq!(resolve_level(Some("ERROR"), false), Level::ERROR);
        assert_eq!(resolve_level(Some("bogus"), false), DEFAULT_LEVEL);
        assert_eq!(resolve_level(None, false), DEFAULT_LEVEL);
    }

    #[test]
    fn test_verbose_wins() {
        assert_eq!(resolve_level(Some("error"), true), Level::DEBUG);
    }
}
