//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sequential unit and HTTP test runner
#[derive(Parser, Debug)]
#[command(name = "suite-runner")]
#[command(version)]
#[command(about = "Run the registered unit and HTTP suites and print a summary")]
#[command(long_about = None)]
pub struct Args {
    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every registered suite
    Run(RunArgs),

    /// Start the demo web app and serve until Ctrl-C
    Serve(ServeArgs),

    /// List registered suites and their cases
    List,

    /// Describe the supported environment variables
    Env,

    /// Write the effective configuration to a file
    Init(InitArgs),

    /// Print a saved run report
    Show(ShowArgs),
}

/// Arguments for run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Output format (table, json, json-pretty)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Exit status policy (always-success, reflect-failures)
    #[arg(long)]
    pub exit_policy: Option<String>,

    /// Timeout in seconds for each HTTP suite suspension point
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Port the demo web app listens on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Save the run report to a file (.json, .yaml)
    #[arg(short, long)]
    pub save: Option<PathBuf>,
}

/// Arguments for serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output file (.yaml, .yml or .json)
    #[arg(default_value = "suite-runner.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Report file written by `run --save`
    pub path: PathBuf,

    /// Output format (table, json, json-pretty)
    #[arg(short, long)]
    pub format: Option<String>,
}
