//! # CLI Command Implementations
//!
//! Each subcommand lives in its own file with an `Args` struct derived using
//! `clap` and an `execute` function calling into the `scaffold_merge`
//! library. Both commands locate their plan the same way, through
//! [`PlanArgs`].

pub mod apply;
pub mod check;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use scaffold_merge::config::{self, Plan, DEFAULT_PLAN_FILE};
use scaffold_merge::installer::Installer;
use scaffold_merge::suggestions;

/// Arguments locating the plan, its templates and the project.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Path to the installation plan
    #[arg(short, long, value_name = "PATH", env = "SCAFFOLD_PLAN")]
    pub plan: Option<PathBuf>,

    /// Directory holding the stubs and templates (defaults to the plan's directory)
    #[arg(short, long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Project to install into (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl PlanArgs {
    /// Resolve the paths and parse the plan.
    pub fn load(&self) -> Result<(Plan, Installer)> {
        let plan_path = self
            .plan
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAN_FILE));

        if !plan_path.is_file() {
            return Err(suggestions::plan_not_found(&plan_path));
        }

        let templates = match &self.templates {
            Some(dir) => dir.clone(),
            None => plan_dir(&plan_path),
        };
        let project = match &self.project {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to get current directory")?,
        };

        let plan = config::from_file(&plan_path)
            .with_context(|| format!("Failed to load plan from {}", plan_path.display()))?;
        log::debug!(
            "Loaded {} step(s) from {}, templates in {}",
            plan.len(),
            plan_path.display(),
            templates.display()
        );

        Ok((plan, Installer::new(templates, project)))
    }
}

fn plan_dir(plan_path: &Path) -> PathBuf {
    match plan_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
