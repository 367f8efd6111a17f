//! Apply command implementation
//!
//! Loads the plan, runs every installer phase and writes the changed files
//! (unless `--dry-run` is given), then prints a Task/Status summary.

use std::time::Instant;

use anyhow::Result;
use clap::Args;

use scaffold_merge::output::{emoji, render_report, OutputConfig};

use super::PlanArgs;

/// Arguments for the apply command
#[derive(Args, Debug, Clone, Default)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();
    let (plan, installer) = args.plan.load()?;
    let quiet = args.plan.quiet;

    if !quiet {
        println!("{} Scaffold Merge Apply", emoji(output, "🔍", "==>"));
        println!();
        if args.dry_run {
            println!("{} DRY RUN MODE - No changes will be made", emoji(output, "🔎", "[DRY RUN]"));
            println!();
        }
    }

    let report = installer.install(&plan, args.dry_run)?;

    if !quiet {
        print!("{}", render_report(&report, output));
        println!();

        let verb = if report.written { "written" } else { "would change" };
        println!(
            "{} {} step(s) in {:.2}s, {} file(s) {}",
            emoji(output, "✅", "[OK]"),
            report.steps.len(),
            start_time.elapsed().as_secs_f64(),
            report.changed_files.len(),
            verb
        );
        for path in &report.changed_files {
            println!("   {}", path.display());
        }
        if report.skipped() > 0 {
            println!(
                "{} {} step(s) skipped",
                emoji(output, "⏭️", "[SKIP]"),
                report.skipped()
            );
        }
        if report.degraded() > 0 {
            println!(
                "{} {} construct(s) could not be merged; see the table above",
                emoji(output, "⚠️", "[WARN]"),
                report.degraded()
            );
        }
    }

    Ok(())
}
