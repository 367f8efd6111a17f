//! # Output Configuration
//!
//! Controls how the CLI renders installation reports, including color and
//! emoji support based on terminal capabilities and user preferences.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scaffold_merge::output::{OutputConfig, emoji};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Installing...", emoji(&config, "🔍", "[SCAN]"));
//! ```

use std::env;
use std::fmt::Write;

use console::style;

use crate::installer::{InstallReport, StepStatus};

/// Width of the task column in report tables.
const TASK_WIDTH: usize = 48;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: `always`, `never` or `auto`.
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, otherwise the plain text
/// alternative.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

fn status_cell(config: &OutputConfig, status: &StepStatus) -> String {
    match status {
        StepStatus::Applied => {
            let label = format!("{} applied", emoji(config, "✅", "[OK]"));
            paint(config, label, |s| style(s).green().to_string())
        }
        StepStatus::Unchanged => {
            let label = format!("{} unchanged", emoji(config, "➖", "[--]"));
            paint(config, label, |s| style(s).dim().to_string())
        }
        StepStatus::Skipped(reason) => {
            let label = format!("{} skipped ({})", emoji(config, "⚠️", "[SKIP]"), reason);
            paint(config, label, |s| style(s).yellow().to_string())
        }
    }
}

fn paint(config: &OutputConfig, text: String, styled: impl Fn(String) -> String) -> String {
    if config.use_color {
        styled(text)
    } else {
        text
    }
}

/// Render an installation report as a Task/Status table. Degraded
/// constructs of merge steps are listed under their step.
pub fn render_report(report: &InstallReport, config: &OutputConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<width$} Status", "Task", width = TASK_WIDTH);

    for step in &report.steps {
        let _ = writeln!(
            out,
            "{:<width$} {}",
            step.task,
            status_cell(config, &step.status),
            width = TASK_WIDTH
        );
        for construct in step.degraded() {
            let _ = writeln!(
                out,
                "  {} {}: {}",
                emoji(config, "⚠️", "!"),
                construct.construct,
                construct.outcome
            );
        }
    }

    out
}
