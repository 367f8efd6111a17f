//! # Check Command Implementation
//!
//! Runs a plan in dry-run mode and fails when any project file would
//! change. A plan that was installed before should be a fixed point, so this
//! doubles as a verification that a previous install is complete.
//!
//! This command is read-only.

use anyhow::Result;
use clap::Args;

use scaffold_merge::output::{emoji, render_report, OutputConfig};

use super::PlanArgs;

/// Verify that a plan is already installed
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, output: &OutputConfig) -> Result<()> {
    let (plan, installer) = args.plan.load()?;
    let report = installer.install(&plan, true)?;

    if !args.plan.quiet {
        print!("{}", render_report(&report, output));
        println!();
    }

    if report.has_changes() {
        let files: Vec<String> = report
            .changed_files
            .iter()
            .map(|path| format!("  {}", path.display()))
            .collect();
        anyhow::bail!(
            "{} file(s) are not up to date:\n{}\n\nhint: Run 'scaffold-merge apply' to install the plan",
            report.changed_files.len(),
            files.join("\n")
        );
    }

    if !args.plan.quiet {
        println!("{} Plan is fully installed", emoji(output, "✅", "[OK]"));
    }
    Ok(())
}
