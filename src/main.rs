//! Suite Runner - sequential unit and HTTP test runner
//!
//! Runs a fixed registry of suites against a small demo library and a demo
//! web app, prints each settled case as it happens, then a summary.
//!
//! ## Features
//!
//! - Synchronous unit cases that signal success through a completion token
//! - HTTP suites that start a server before their cases and stop it after
//! - Strict ordering: all unit suites, then all HTTP suites, one case at a time
//! - Optional per-suite timeouts
//! - Table or JSON output, optional JSON/YAML run report
//!
//! ## Usage
//!
//! ```bash
//! # Run every suite
//! suite-runner
//!
//! # Fail the process when a case fails
//! suite-runner run --exit-policy reflect-failures
//!
//! # Machine-readable output, saved report
//! suite-runner run --format json --save report.yaml
//!
//! # Print a saved report
//! suite-runner show report.yaml
//!
//! # Serve the demo web app
//! suite-runner serve --port 3005
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info};

mod cli;
mod config;
mod demo;
mod executor;
mod http;
mod models;
mod output;
mod results;
mod suites;
mod utils;

use cli::{Args, Command};
use config::{EnvConfig, ExitPolicy, RunnerConfig};
use demo::web_app::WebApp;
use executor::Runner;
use output::{ConsoleSink, OutputFormat, ResultFormatter};
use results::RunReport;
use utils::logger::{init_logger, resolve_level};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env = EnvConfig::load();
    let config_path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(PathBuf::from));
    let mut config = RunnerConfig::resolve(config_path.as_deref())?;
    config.apply_env(&env)?;

    init_logger(resolve_level(config.log_level.as_deref(), args.verbose));
    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }

    match args.command.unwrap_or(Command::Run(cli::RunArgs::default())) {
        Command::Run(run_args) => {
            let code = run_suites(config, run_args).await?;
            // Exit explicitly so nothing left on the runtime keeps the process alive
            std::process::exit(code);
        }
        Command::Serve(serve_args) => {
            serve(config, serve_args).await?;
        }
        Command::List => {
            list_suites(&config);
        }
        Command::Env => {
            config::print_env_help();
        }
        Command::Init(init_args) => {
            write_config(&config, &init_args)?;
            println!("✓ Configuration file created: {}", init_args.output.display());
        }
        Command::Show(show_args) => {
            println!("{}", render_saved_report(&config, &show_args)?);
        }
    }

    Ok(())
}

/// Apply command-line overrides on top of file and environment values
fn apply_run_args(config: &mut RunnerConfig, args: &cli::RunArgs) -> Result<()> {
    if let Some(format) = &args.format {
        config.output.format = format.clone();
    }
    if let Some(policy) = &args.exit_policy {
        config.exit_policy = ExitPolicy::from_str(policy)
            .ok_or_else(|| anyhow::anyhow!("Unknown exit policy: {policy}"))?;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = Some(timeout);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_color {
        config.output.color = false;
    }
    if let Some(path) = &args.save {
        config.output.save_path = Some(path.clone());
    }
    config.validate()
}

/// Run the registry and return the process exit code
async fn run_suites(mut config: RunnerConfig, args: cli::RunArgs) -> Result<i32> {
    apply_run_args(&mut config, &args)?;

    let format = OutputFormat::from_str(&config.output.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", config.output.format))?;
    let mut formatter = ResultFormatter::new(format);
    if !config.output.color {
        formatter = formatter.no_color();
    }

    info!(
        "Exit policy: {}, server: {}",
        config.exit_policy,
        config.server.base_url()
    );

    let mut runner =
        Runner::new(suites::registry(&config)).with_timeout(config.timeout());
    if format.is_streaming() {
        runner = runner.with_sink(ConsoleSink::new(formatter.clone()));
    }

    let outcome = match runner.run().await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Run aborted: {}", e);
            return Ok(1);
        }
    };

    let run = outcome.to_run_report();
    if !format.is_streaming() {
        println!("{}", formatter.format_run(&run, &outcome.report));
    }

    if let Some(path) = &config.output.save_path {
        run.save(path)?;
    }

    Ok(config.exit_policy.exit_code(&outcome.summary))
}

async fn serve(mut config: RunnerConfig, args: cli::ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let handle = WebApp::new(config.server).start().await?;
    println!("Serving {} (Ctrl-C to stop)", handle.url("/"));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    handle.shutdown().await
}

/// Save the effective configuration, refusing to overwrite unless forced
fn write_config(config: &RunnerConfig, args: &cli::InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            args.output.display()
        );
    }
    config.save(&args.output)
}

/// Load a saved run report and render it like a live run
fn render_saved_report(config: &RunnerConfig, args: &cli::ShowArgs) -> Result<String> {
    let run = RunReport::load(&args.path)?;

    let name = args.format.as_deref().unwrap_or(&config.output.format);
    let format = OutputFormat::from_str(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {name}"))?;
    let mut formatter = ResultFormatter::new(format);
    if !config.output.color {
        formatter = formatter.no_color();
    }

    debug!("Loaded run {} with {} records", run.id, run.records.len());
    Ok(formatter.format_run(&run, &run.to_report()))
}

fn list_suites(config: &RunnerConfig) {
    let registry = suites::registry(&config);

    println!("\nRegistered suites ({} cases)\n", registry.case_count());

    for suite in &registry.unit_suites {
        println!("[unit] {}", suite.name);
        for (i, case) in suite.cases.iter().enumerate() {
            println!("  {:2}. {}", i + 1, case.title);
        }
    }

    for suite in &registry.http_suites {
        println!("[http] {}", suite.name);
        for (i, case) in suite.cases.iter().enumerate() {
            println!("  {:2}. {}", i + 1, case.title);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_run_args() {
        let mut config = RunnerConfig::default();
        let args = cli::RunArgs {
            format: Some("json".to_string()),
            exit_policy: Some("reflect-failures".to_string()),
            timeout: Some(3),
            port: Some(4200),
            no_color: true,
            save: None,
        };

        apply_run_args(&mut config, &args).unwrap();
        assert_eq!(config.output.format, "json");
        assert_eq!(config.exit_policy, ExitPolicy::ReflectFailures);
        assert_eq!(config.timeout_secs, Some(3));
        assert_eq!(config.server.port, 4200);
        assert!(!config.output.color);
    }

    #[test]
    fn test_write_config_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("suite-runner.yaml");
        let mut config = RunnerConfig::default();
        config.server.port = 4300;

        let args = cli::InitArgs {
            output: output.clone(),
            force: false,
        };
        write_config(&config, &args).unwrap();
        assert_eq!(RunnerConfig::load(&output).unwrap().server.port, 4300);

        assert!(write_config(&config, &args).is_err());

        let forced = cli::InitArgs { output, force: true };
        assert!(write_config(&config, &forced).is_ok());
    }

    #[test]
    fn test_render_saved_report() {
        use crate::models::{Outcome, ResultRecord, TestType};
        use crate::results::Report;
        use crate::utils::timer::PhaseDurations;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        let mut report = Report::new();
        report.append(ResultRecord::new(
            TestType::Http,
            "web_app",
            "Web App - Simple GET request status is 200",
            Outcome::Passed,
            2,
        ));
        let now = chrono::Utc::now();
        RunReport::new(&report, PhaseDurations::default(), now, now)
            .save(&path)
            .unwrap();

        let mut config = RunnerConfig::default();
        config.output.color = false;
        let table = render_saved_report(
            &config,
            &cli::ShowArgs {
                path: path.clone(),
                format: None,
            },
        )
        .unwrap();
        assert!(table.contains("Total success: 1"));

        let json = render_saved_report(
            &config,
            &cli::ShowArgs {
                path,
                format: Some("json".to_string()),
            },
        )
        .unwrap();
        assert!(json.contains("\"phases\""));
    }

    #[test]
    fn test_apply_run_args_rejects_unknown_values() {
        let mut config = RunnerConfig::default();
        let args = cli::RunArgs {
            exit_policy: Some("sometimes".to_string()),
            ..Default::default()
        };
        assert!(apply_run_args(&mut config, &args).is_err());

        let args = cli::RunArgs {
            format: Some("xml".to_string()),
            ..Default::default()
        };
        assert!(apply_run_args(&mut config, &args).is_err());
    }
}
