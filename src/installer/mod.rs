//! # Plan Installer
//!
//! Runs an installation plan against a project directory. The plan is
//! executed in fixed phases so later steps always see the results of
//! earlier ones:
//!
//! 1.  **Load**: every project file the plan references (plus files matched
//!     by namespace globs) is read into a [`MemoryFS`]. Nothing is written
//!     until the last phase.
//! 2.  **Copy**: stubs are staged from the template root.
//! 3.  **Merge**: merge steps are grouped per target file and the groups run
//!     in parallel through [`orchestrate_files`].
//! 4.  **Namespace**: placeholder namespaces are rewritten.
//! 5.  **Ensure-line** and **env** edits.
//! 6.  **Write**: each changed file is written once, atomically.
//!
//! Within a phase, steps run in plan order. The returned [`InstallReport`]
//! lists steps in plan order regardless of phase.

mod edits;
mod report;

pub use edits::{declares_env_var, ensure_env_vars, ensure_line, LineEdit};
pub use report::{InstallReport, StepStatus, TaskReport};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, info};

use crate::config::{CopyOp, EnsureLineOp, EnvOp, MergeOp, NamespaceOp, Operation, Plan};
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use crate::orchestrator::{orchestrate_files, FileMerge, MergeStep, Orchestration, StepReport};
use crate::spec::MergeSpec;

/// Directories never scanned for namespace targets.
const SKIP_DIRS: &[&str] = &["vendor", "node_modules", "storage", "bootstrap"];

/// Executes plans against one project using stubs from one template root.
#[derive(Debug, Clone)]
pub struct Installer {
    template_root: PathBuf,
    project_root: PathBuf,
}

impl Installer {
    pub fn new(template_root: impl Into<PathBuf>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            template_root: template_root.into(),
            project_root: project_root.into(),
        }
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Run every phase except the write, returning the staged filesystem.
    pub fn stage(&self, plan: &Plan) -> Result<(MemoryFS, InstallReport)> {
        let mut staged = self.load(plan)?;
        let mut slots: Vec<Option<TaskReport>> = vec![None; plan.len()];

        for (index, operation) in plan.iter().enumerate() {
            if let Operation::Copy { copy } = operation {
                let status = self.copy(&mut staged, copy)?;
                slots[index] = Some(record(format!("copy {}", copy.to), status));
            }
        }

        self.merge(&mut staged, plan, &mut slots)?;

        for (index, operation) in plan.iter().enumerate() {
            if let Operation::Namespace { namespace } = operation {
                let status = rewrite_namespaces(&mut staged, namespace)?;
                let task = format!("namespace {}", namespace.files.join(", "));
                slots[index] = Some(record(task, status));
            }
        }

        for (index, operation) in plan.iter().enumerate() {
            if let Operation::EnsureLine { ensure_line } = operation {
                let status = apply_ensure_line(&mut staged, ensure_line);
                slots[index] = Some(record(format!("ensure-line {}", ensure_line.file), status));
            }
        }

        for (index, operation) in plan.iter().enumerate() {
            if let Operation::Env { env } = operation {
                let status = apply_env(&mut staged, env);
                slots[index] = Some(record(format!("env {}", env.file), status));
            }
        }

        let report = InstallReport {
            steps: slots.into_iter().flatten().collect(),
            changed_files: staged.changed_files(),
            written: false,
        };
        Ok((staged, report))
    }

    /// Run the plan. With `dry_run` nothing is written; the report still
    /// lists the files that would change.
    pub fn install(&self, plan: &Plan, dry_run: bool) -> Result<InstallReport> {
        let (staged, mut report) = self.stage(plan)?;

        if dry_run {
            debug!("dry run: {} file(s) would change", report.changed_files.len());
            return Ok(report);
        }

        for relative in &report.changed_files {
            let Some(file) = staged.get_file(relative) else {
                continue;
            };
            let full_path = self.project_root.join(relative);
            write_atomic(&full_path, &file.content)?;
            info!("Wrote {}", full_path.display());
        }
        report.written = true;
        Ok(report)
    }

    /// Phase 1: read every referenced project file.
    fn load(&self, plan: &Plan) -> Result<MemoryFS> {
        let mut staged = MemoryFS::new();
        let mut globs = Vec::new();

        for operation in plan {
            match operation {
                Operation::Copy { copy } => {
                    staged.load(&self.project_root, &copy.to)?;
                }
                Operation::Merge { merge } => {
                    staged.load(&self.project_root, &merge.target)?;
                }
                Operation::Namespace { namespace } => {
                    staged.load(&self.project_root, &namespace.reference)?;
                    for pattern in &namespace.files {
                        globs.push(Pattern::new(pattern)?);
                    }
                }
                Operation::EnsureLine { ensure_line } => {
                    staged.load(&self.project_root, &ensure_line.file)?;
                }
                Operation::Env { env } => {
                    staged.load(&self.project_root, &env.file)?;
                }
            }
        }

        if !globs.is_empty() {
            for relative in project_files(&self.project_root)? {
                if globs.iter().any(|glob| glob.matches_path(&relative)) {
                    staged.load(&self.project_root, &relative)?;
                }
            }
        }

        if staged.is_empty() {
            debug!("No referenced project file exists yet");
        } else {
            debug!("Loaded {} project file(s)", staged.len());
        }
        Ok(staged)
    }

    fn read_template(&self, step: &str, relative: &str) -> Result<String> {
        let path = self.template_root.join(relative);
        fs::read_to_string(&path).map_err(|e| Error::Install {
            step: step.to_string(),
            message: format!("cannot read template '{}': {}", path.display(), e),
        })
    }

    fn copy(&self, staged: &mut MemoryFS, copy: &CopyOp) -> Result<StepStatus> {
        if !copy.overwrite && staged.exists(&copy.to) {
            return Ok(StepStatus::Skipped("destination exists".to_string()));
        }

        let content = self.read_template("copy", &copy.from)?;
        if staged.content(&copy.to) == Some(content.as_str()) {
            return Ok(StepStatus::Unchanged);
        }
        staged.set_content(&copy.to, content);
        Ok(StepStatus::Applied)
    }

    /// Phase 3: merge steps, one orchestration per target file.
    fn merge(
        &self,
        staged: &mut MemoryFS,
        plan: &Plan,
        slots: &mut [Option<TaskReport>],
    ) -> Result<()> {
        let mut prepared: Vec<(usize, &MergeOp, Vec<MergeSpec>, String)> = Vec::new();
        for (index, operation) in plan.iter().enumerate() {
            if let Operation::Merge { merge } = operation {
                let specs = merge.specs()?;
                let template = self.read_template("merge", &merge.template)?;
                prepared.push((index, merge, specs, template));
            }
        }

        let mut batches: Vec<FileMerge<'_>> = Vec::new();
        // Per batch: (plan index, number of constructs) of each merge step.
        let mut owners: Vec<Vec<(usize, usize)>> = Vec::new();

        for (index, merge, specs, template) in &prepared {
            let Some(target) = staged.content(&merge.target) else {
                slots[*index] = Some(record(
                    format!("merge {}", merge.target),
                    StepStatus::Skipped("target not found".to_string()),
                ));
                continue;
            };

            let path = PathBuf::from(&merge.target);
            let batch = match batches.iter().position(|batch| batch.path == path) {
                Some(batch) => batch,
                None => {
                    batches.push(FileMerge {
                        path,
                        target: target.to_string(),
                        steps: Vec::new(),
                    });
                    owners.push(Vec::new());
                    batches.len() - 1
                }
            };
            batches[batch]
                .steps
                .extend(specs.iter().map(|spec| MergeStep::new(spec, template.as_str())));
            owners[batch].push((*index, specs.len()));
        }

        for ((path, orchestration), owned) in orchestrate_files(batches).into_iter().zip(owners) {
            let Orchestration { text, steps } = orchestration;
            let mut steps = steps.into_iter();

            for (index, count) in owned {
                let constructs: Vec<StepReport> = steps.by_ref().take(count).collect();
                let status = if constructs.iter().any(|step| step.outcome.is_change()) {
                    StepStatus::Applied
                } else {
                    StepStatus::Unchanged
                };
                let mut report = record(format!("merge {}", path.display()), status);
                report.constructs = constructs;
                slots[index] = Some(report);
            }
            staged.set_content(&path, text);
        }

        Ok(())
    }
}

fn record(task: String, status: StepStatus) -> TaskReport {
    match &status {
        StepStatus::Skipped(reason) => info!("{}: skipped, {}", task, reason),
        other => debug!("{}: {}", task, other),
    }
    TaskReport::new(task, status)
}

fn rewrite_namespaces(staged: &mut MemoryFS, op: &NamespaceOp) -> Result<StepStatus> {
    let rewriter = op.rewriter()?;
    let reference = match staged.content(&op.reference) {
        Some(reference) => reference.to_string(),
        None => return Ok(StepStatus::Skipped(format!("'{}' not found", op.reference))),
    };
    match rewriter.detect(&reference) {
        Some(namespace) => debug!("Root namespace is {}", namespace),
        None => {
            return Ok(StepStatus::Skipped(format!(
                "no namespace declared in '{}'",
                op.reference
            )))
        }
    }

    let mut files = BTreeSet::new();
    for pattern in &op.files {
        files.extend(staged.list_files_glob(pattern)?);
    }

    let mut changed = false;
    for path in files {
        let Some(content) = staged.content(&path) else {
            continue;
        };
        let rewritten = rewriter.rewrite(&reference, content);
        if rewritten != content {
            staged.set_content(&path, rewritten);
            changed = true;
        }
    }

    Ok(if changed {
        StepStatus::Applied
    } else {
        StepStatus::Unchanged
    })
}

fn apply_ensure_line(staged: &mut MemoryFS, op: &EnsureLineOp) -> StepStatus {
    let Some(content) = staged.content(&op.file) else {
        return StepStatus::Skipped("file not found".to_string());
    };
    match ensure_line(content, &op.after, &op.line) {
        LineEdit::Inserted(text) => {
            staged.set_content(&op.file, text);
            StepStatus::Applied
        }
        LineEdit::Present => StepStatus::Unchanged,
        LineEdit::AnchorNotFound => StepStatus::Skipped("anchor not found".to_string()),
    }
}

fn apply_env(staged: &mut MemoryFS, op: &EnvOp) -> StepStatus {
    let content = staged.content(&op.file).unwrap_or_default();
    let updated = ensure_env_vars(content, &op.vars);
    if updated == content && staged.exists(&op.file) {
        return StepStatus::Unchanged;
    }
    staged.set_content(&op.file, updated);
    StepStatus::Applied
}

/// Project-relative paths of all regular files under `root`, skipping
/// hidden and dependency directories.
fn project_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_str().unwrap_or("");
            !name.starts_with('.') && !SKIP_DIRS.contains(&name)
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        let relative = entry.path().strip_prefix(root).map_err(|_| Error::Filesystem {
            message: format!("Failed to make path relative: {}", entry.path().display()),
        })?;
        files.push(relative.to_path_buf());
    }
    Ok(files)
}

/// Write through a sibling temp file so a crash never leaves a half-written
/// source file behind.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::Filesystem {
            message: format!("Invalid file path '{}'", path.display()),
        })?;
    let temp_path = path.with_file_name(format!(".{}.scaffold-tmp", file_name));

    fs::write(&temp_path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", temp_path.display(), e),
    })?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(&temp_path, metadata.permissions())?;
    }
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::Filesystem {
            message: format!("Failed to replace '{}': {}", path.display(), e),
        }
    })
}
