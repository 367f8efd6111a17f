//! Merge orchestration
//!
//! Runs an ordered list of construct merges against one target text. Each
//! step reads the text produced by the previous step. A step that cannot
//! write (missing anchor, inconsistent replacement pattern) is logged and
//! skipped; the remaining steps still run.
//!
//! Different target files share no state, so [`orchestrate_files`] merges a
//! batch of files in parallel while keeping every file's steps sequential.

use std::path::PathBuf;

use log::{debug, warn};
use rayon::prelude::*;

use crate::merge::{merge_construct, MergeOutcome};
use crate::spec::MergeSpec;

/// One construct merge: which construct, and the template it comes from.
#[derive(Debug, Clone, Copy)]
pub struct MergeStep<'a> {
    pub spec: &'a MergeSpec,
    pub template: &'a str,
}

impl<'a> MergeStep<'a> {
    pub fn new(spec: &'a MergeSpec, template: &'a str) -> Self {
        Self { spec, template }
    }
}

/// Outcome of one step, keyed by construct name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub construct: String,
    pub outcome: MergeOutcome,
}

/// Final text of one target plus the outcome of every step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orchestration {
    pub text: String,
    pub steps: Vec<StepReport>,
}

impl Orchestration {
    /// Whether any step changed the text.
    pub fn changed(&self) -> bool {
        self.steps.iter().any(|step| step.outcome.is_change())
    }

    /// Steps that had content to write but could not write it.
    pub fn degraded(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| step.outcome.is_degraded())
    }
}

/// Run `steps` in order against `target`.
///
/// `label` names the target in log messages (usually its path).
pub fn orchestrate(label: &str, target: &str, steps: &[MergeStep<'_>]) -> Orchestration {
    let mut text = target.to_string();
    let mut reports = Vec::with_capacity(steps.len());

    for step in steps {
        let merged = merge_construct(step.spec, step.template, &text);

        if merged.outcome.is_degraded() {
            warn!(
                "{}: could not merge '{}' ({}), leaving it as is",
                label,
                step.spec.name(),
                merged.outcome
            );
        } else {
            debug!("{}: {} -> {}", label, step.spec.name(), merged.outcome);
        }

        reports.push(StepReport {
            construct: step.spec.name().to_string(),
            outcome: merged.outcome,
        });
        text = merged.text;
    }

    Orchestration {
        text,
        steps: reports,
    }
}

/// A target file and the merges to run against it.
#[derive(Debug, Clone)]
pub struct FileMerge<'a> {
    pub path: PathBuf,
    pub target: String,
    pub steps: Vec<MergeStep<'a>>,
}

/// Orchestrate several independent files in parallel.
///
/// Results come back in input order.
pub fn orchestrate_files(files: Vec<FileMerge<'_>>) -> Vec<(PathBuf, Orchestration)> {
    files
        .into_par_iter()
        .map(|file| {
            let label = file.path.display().to_string();
            let result = orchestrate(&label, &file.target, &file.steps);
            (file.path, result)
        })
        .collect()
}
