//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::commands;
use scaffold_merge::output::OutputConfig;

/// Scaffold Merge - Merge scaffolded PHP fragments into an existing project
#[derive(Parser, Debug)]
#[command(name = "scaffold-merge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level
    #[arg(long, global = true, value_name = "LEVEL", value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install a .scaffold.yaml plan into the current project
    Apply(commands::apply::ApplyArgs),

    /// Verify that a plan is already installed (exits non-zero if not)
    Check(commands::check::CheckArgs),
}

/// Log levels accepted by `--log-level`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // RUST_LOG still wins when it is set.
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_filter()),
        )
        .format_timestamp(None)
        .init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Apply(args) => commands::apply::execute(args, &output),
            Commands::Check(args) => commands::check::execute(args, &output),
        }
    }
}
