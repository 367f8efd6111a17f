//! # Scaffold Merge CLI
//!
//! This is the binary entry point for the `scaffold-merge` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Handling top-level application errors and translating them into user-friendly
//!   output.
//!
//! The merge engine and installer live in the `scaffold_merge` library; the
//! binary only loads a plan, runs it and prints the result.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
