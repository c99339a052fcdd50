//! Registered suites
//!
//! The fixed set of suites the runner executes. There is no discovery: a suite
//! runs only if it is added here.

mod http_web_app;
mod unit_lib;

use crate::config::RunnerConfig;
use crate::models::{HttpSuite, Registry};

/// Build the registry: the `lib` unit suite, then the `web_app` HTTP suite
pub fn registry(config: &RunnerConfig) -> Registry {
    Registry::new()
        .add_unit(unit_lib::suite())
        .add_http(bounded(http_web_app::suite(&config.server), config))
}

/// Apply the configured per-suite timeout, if any
fn bounded(suite: HttpSuite, config: &RunnerConfig) -> HttpSuite {
    match config.suite_timeout(&suite.name) {
        Some(timeout) => suite.with_timeout(timeout),
        None => suite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contents() {
        let registry = registry(&RunnerConfig::default());

        assert_eq!(registry.unit_suites.len(), 1);
        assert_eq!(registry.unit_suites[0].name, "lib");
        assert_eq!(registry.http_suites.len(), 1);
        assert_eq!(registry.http_suites[0].name, "web_app");
        assert_eq!(registry.case_count(), 13);
        assert_eq!(registry.http_suites[0].timeout, None);
    }

    #[test]
    fn test_registry_applies_suite_timeout() {
        let mut config = RunnerConfig::default();
        config.suite_timeouts.insert("web_app".to_string(), 4);

        let registry = registry(&config);
        assert_eq!(
            registry.http_suites[0].timeout,
            Some(std::time::Duration::from_secs(4))
        );
    }
}
