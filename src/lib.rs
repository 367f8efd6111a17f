//! # Scaffold Merge Library
//!
//! Merges list-shaped code constructs (imports, trait lists, `implements`
//! clauses, array properties) from a scaffolding template into a user-owned
//! PHP source file without clobbering what the user already wrote. Running
//! the same merge twice leaves the file untouched.
//!
//! ## Quick Example
//!
//! ```
//! use scaffold_merge::orchestrator::{orchestrate, MergeStep};
//! use scaffold_merge::presets::Preset;
//!
//! let template = "class User\n{\n    protected $hidden = ['password', 'authy_id'];\n}\n";
//! let target = "class User extends Model\n{\n    protected $hidden = ['password'];\n}\n";
//!
//! let hidden = Preset::Hidden.spec();
//! let merged = orchestrate("User.php", target, &[MergeStep::new(&hidden, template)]);
//!
//! assert!(merged.text.contains("'password',\n        'authy_id',"));
//!
//! // A second run is a fixed point.
//! let again = orchestrate("User.php", &merged.text, &[MergeStep::new(&hidden, template)]);
//! assert_eq!(again.text, merged.text);
//! ```
//!
//! ## Core Concepts
//!
//! - **Merge specs (`spec`, `presets`)**: a construct is described by three
//!   regular expressions: one to read its items, one to rewrite it in place
//!   and one anchor to insert it when absent.
//! - **Engine (`merge`)**: extracts items from template and target, merges
//!   them (union, dedup, exclusion, optional natural sort) and writes the
//!   result back.
//! - **Orchestration (`orchestrator`)**: threads one target through an
//!   ordered list of construct merges; independent files run in parallel.
//! - **Installer (`config`, `installer`, `filesystem`)**: executes a YAML
//!   installation plan (copy stubs, merge constructs, rewrite namespaces,
//!   register lines, declare env vars) against a project, staging every edit
//!   in memory and writing each changed file once.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod installer;
pub mod merge;
pub mod namespace;
pub mod orchestrator;
pub mod output;
pub mod presets;
pub mod spec;
pub mod suggestions;

#[cfg(test)]
mod merge_proptest;
