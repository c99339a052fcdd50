//! Configuration module
//!
//! Runner configuration loaded from YAML or JSON, overridden by environment
//! variables and finally by command-line flags.

mod env;

pub use env::{print_env_help, EnvConfig};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::results::Summary;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./suite-runner.yaml",
    "./suite-runner.yml",
    "./.suite-runner.yaml",
    "~/.config/suite-runner/config.yaml",
];

/// How the run outcome maps to the process exit status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitPolicy {
    /// Exit 0 whenever the run completes, regardless of failures
    #[default]
    AlwaysSuccess,
    /// Exit 1 when any case failed
    ReflectFailures,
}

impl ExitPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "always-success" | "always" => Some(ExitPolicy::AlwaysSuccess),
            "reflect-failures" | "strict" => Some(ExitPolicy::ReflectFailures),
            _ => None,
        }
    }

    pub fn exit_code(&self, summary: &Summary) -> i32 {
        match self {
            ExitPolicy::AlwaysSuccess => 0,
            ExitPolicy::ReflectFailures if summary.passed => 0,
            ExitPolicy::ReflectFailures => 1,
        }
    }
}

impl fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitPolicy::AlwaysSuccess => write!(f, "always-success"),
            ExitPolicy::ReflectFailures => write!(f, "reflect-failures"),
        }
    }
}

/// Where the demo web app listens
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3005,
        }
    }
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Report rendering options
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// table, json or json-pretty
    pub format: String,

    /// Colorize table output
    pub color: bool,

    /// Also write the run report to this file (JSON, or YAML by extension)
    pub save_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
            color: true,
            save_path: None,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub exit_policy: ExitPolicy,

    /// Bound on HTTP suite suspension points; unbounded when absent
    pub timeout_secs: Option<u64>,

    /// Per HTTP suite bounds, keyed by suite name; these win over `timeout_secs`
    pub suite_timeouts: BTreeMap<String, u64>,

    /// Log level when not running verbose
    pub log_level: Option<String>,

    pub server: ServerConfig,

    pub output: OutputConfig,
}

impl RunnerConfig {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load from an explicit path, else the first standard location, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(Self::find) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply environment overrides on top of file values
    pub fn apply_env(&mut self, env: &EnvConfig) -> Result<()> {
        if let Some(policy) = &env.exit_policy {
            self.exit_policy = ExitPolicy::from_str(policy)
                .with_context(|| format!("Unknown exit policy: {policy}"))?;
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = Some(timeout);
        }
        if let Some(host) = &env.host {
            self.server.host = host.clone();
        }
        if let Some(port) = env.port {
            self.server.port = port;
        }
        if let Some(format) = &env.format {
            self.output.format = format.clone();
        }
        if env.no_color == Some(true) {
            self.output.color = false;
        }
        if let Some(level) = &env.log_level {
            self.log_level = Some(level.clone());
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be fixed; 0 would give every suite a different port");
        }
        if self.timeout_secs == Some(0) {
            anyhow::bail!("Timeout must be at least 1 second");
        }
        if let Some((suite, _)) = self.suite_timeouts.iter().find(|(_, secs)| **secs == 0) {
            anyhow::bail!("Timeout for suite '{suite}' must be at least 1 second");
        }
        if crate::output::OutputFormat::from_str(&self.output.format).is_none() {
            anyhow::bail!("Unsupported output format: {}", self.output.format);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn suite_timeout(&self, suite: &str) -> Option<Duration> {
        self.suite_timeouts.get(suite).copied().map(Duration::from_secs)
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
