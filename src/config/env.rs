//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "SUITE_RUNNER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Config file from SUITE_RUNNER_CONFIG
    pub config_file: Option<String>,
    /// Exit policy from SUITE_RUNNER_EXIT_POLICY
    pub exit_policy: Option<String>,
    /// Timeout from SUITE_RUNNER_TIMEOUT
    pub timeout: Option<u64>,
    /// Demo server host from SUITE_RUNNER_HOST
    pub host: Option<String>,
    /// Demo server port from SUITE_RUNNER_PORT
    pub port: Option<u16>,
    /// Output format from SUITE_RUNNER_FORMAT
    pub format: Option<String>,
    /// Disable colors from SUITE_RUNNER_NO_COLOR
    pub no_color: Option<bool>,
    /// Log level from SUITE_RUNNER_LOG
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            config_file: get_env("CONFIG"),
            exit_policy: get_env("EXIT_POLICY"),
            timeout: get_env_parse("TIMEOUT"),
            host: get_env("HOST"),
            port: get_env_parse("PORT"),
            format: get_env("FORMAT"),
            no_color: get_env_bool("NO_COLOR"),
            log_level: get_env("LOG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.config_file.is_some()
            || self.exit_policy.is_some()
            || self.timeout.is_some()
            || self.host.is_some()
            || self.port.is_some()
            || self.format.is_some()
            || self.no_color.is_some()
            || self.log_level.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Print all SUITE_RUNNER environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_CONFIG       Path to configuration file");
    println!("  {ENV_PREFIX}_EXIT_POLICY  always-success or reflect-failures");
    println!("  {ENV_PREFIX}_TIMEOUT      HTTP suite timeout in seconds");
    println!("  {ENV_PREFIX}_HOST         Demo server host");
    println!("  {ENV_PREFIX}_PORT         Demo server port");
    println!("  {ENV_PREFIX}_FORMAT       Output format (table, json, json-pretty)");
    println!("  {ENV_PREFIX}_NO_COLOR     Disable colored output (true/false)");
    println!("  {ENV_PREFIX}_LOG          Log level (error, warn, info, debug, trace)");
    println!();
}
