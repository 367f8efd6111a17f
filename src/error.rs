//! # Error Handling
//!
//! This module defines the centralized error type for `scaffold-merge`. It
//! uses `thiserror` to derive an `Error` enum covering the failures that are
//! allowed to stop an installation:
//!
//! - Installation plan parsing errors.
//! - Malformed merge specifications (caught when a spec is built).
//! - Filesystem and I/O failures while loading or writing project files.
//! - Installer step failures (e.g. a stub that cannot be found).
//!
//! Per-construct merge misses (a construct absent from a template, an anchor
//! that does not match) are deliberately not represented here. They are
//! reported as [`crate::merge::MergeOutcome`] values and leave the target
//! text untouched.

use thiserror::Error;

/// Main error type for scaffold-merge operations
#[derive(Error, Debug)]
pub enum Error {
    /// The installation plan could not be parsed.
    ///
    /// Carries an optional hint about how to fix the plan.
    #[error("Plan parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the plan
        hint: Option<String>,
    },

    /// A merge specification has patterns with the wrong number of capture
    /// groups, or a pattern that does not compile.
    #[error("Malformed merge spec '{spec}': {message}")]
    MalformedSpec { spec: String, message: String },

    /// An error occurred with a filesystem operation.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An installer step could not be carried out.
    #[error("Install step '{step}' failed: {message}")]
    Install { step: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
