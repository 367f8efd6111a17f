//! # Structural Fragment Merging
//!
//! This module merges one list-like construct (an array property, an
//! `implements` list, a block of imports) from a template text into a target
//! text. It works on text with regular expressions; it never parses the host
//! language.
//!
//! A single construct merge runs four steps:
//!
//! 1. [`extract::extract`] the template's items. No construct in the template
//!    means there is nothing to merge.
//! 2. [`extract::extract`] the target's items, if the construct exists there.
//! 3. [`list::merge_items`] the two lists. The result also decides the write
//!    path: insertion when the target lacks the construct, replacement when
//!    it has one.
//! 4. [`write::write`] the rendered block back into the target.
//!
//! Misses in step 4 never corrupt the target: the original text is returned
//! and the [`MergeOutcome`] says what went wrong.
//!
//! ## Example
//!
//! ```
//! use scaffold_merge::merge::{merge_construct, MergeOutcome};
//! use scaffold_merge::presets::Preset;
//!
//! let spec = Preset::Fillable.spec();
//! let template = "class User\n{\n    protected $fillable = ['name', 'phone'];\n}\n";
//! let target = "class User\n{\n    protected $fillable = ['name', 'email'];\n}\n";
//!
//! let merged = merge_construct(&spec, template, target);
//! assert_eq!(merged.outcome, MergeOutcome::Replaced);
//! assert!(merged.text.contains("'email',\n        'phone',"));
//! ```

pub mod extract;
pub mod list;
pub mod write;

use std::fmt;

use log::debug;

use crate::spec::MergeSpec;

/// Which pattern a merged block is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// The target lacks the construct; insert a new block after the anchor.
    Insert,
    /// The target has the construct; replace its item block in place.
    Replace,
}

/// Result of merging one construct into a target text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new block was inserted at the anchor.
    Inserted,
    /// The existing block was rewritten with the merged items.
    Replaced,
    /// The merge produced no change to the target.
    Unchanged,
    /// The template does not contain the construct; nothing to merge.
    NotInTemplate,
    /// The construct is absent from the target and the insertion anchor did
    /// not match.
    AnchorNotFound,
    /// The construct was detected in the target but the replacement pattern
    /// did not match.
    ReplacementBoundsNotFound,
}

impl MergeOutcome {
    /// Whether the step had something to write but could not write it.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            MergeOutcome::AnchorNotFound | MergeOutcome::ReplacementBoundsNotFound
        )
    }

    /// Whether the step changed the target text.
    pub fn is_change(&self) -> bool {
        matches!(self, MergeOutcome::Inserted | MergeOutcome::Replaced)
    }
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MergeOutcome::Inserted => "inserted",
            MergeOutcome::Replaced => "replaced",
            MergeOutcome::Unchanged => "unchanged",
            MergeOutcome::NotInTemplate => "not in template",
            MergeOutcome::AnchorNotFound => "anchor not found",
            MergeOutcome::ReplacementBoundsNotFound => "replacement bounds not found",
        };
        f.write_str(label)
    }
}

/// Target text after one construct merge, with what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructMerge {
    pub text: String,
    pub outcome: MergeOutcome,
}

impl ConstructMerge {
    fn kept(target: &str, outcome: MergeOutcome) -> Self {
        Self {
            text: target.to_string(),
            outcome,
        }
    }
}

/// Merge `spec`'s construct from `template` into `target`.
///
/// The returned text equals `target` unless the outcome is
/// [`MergeOutcome::Inserted`] or [`MergeOutcome::Replaced`].
pub fn merge_construct(spec: &MergeSpec, template: &str, target: &str) -> ConstructMerge {
    let Some(template_items) = extract::extract(spec, template) else {
        debug!("{}: construct not found in template", spec.name());
        return ConstructMerge::kept(target, MergeOutcome::NotInTemplate);
    };

    let target_items = extract::extract(spec, target);
    let merged = list::merge_items(&template_items, target_items.as_deref(), spec);

    match merged.mode {
        WriteMode::Insert if merged.items.is_empty() => {
            debug!("{}: nothing left to insert", spec.name());
            return ConstructMerge::kept(target, MergeOutcome::Unchanged);
        }
        // Same items in the same order: leave the user's formatting alone.
        WriteMode::Replace if target_items.as_deref() == Some(merged.items.as_slice()) => {
            debug!("{}: target already holds every item", spec.name());
            return ConstructMerge::kept(target, MergeOutcome::Unchanged);
        }
        _ => {}
    }

    let block = merged.render(spec);
    match write::write(target, spec, merged.mode, &block) {
        Some(text) if text == target => ConstructMerge::kept(target, MergeOutcome::Unchanged),
        Some(text) => {
            let outcome = match merged.mode {
                WriteMode::Insert => MergeOutcome::Inserted,
                WriteMode::Replace => MergeOutcome::Replaced,
            };
            debug!("{}: {} {} item(s)", spec.name(), outcome, merged.items.len());
            ConstructMerge { text, outcome }
        }
        None => {
            let outcome = match merged.mode {
                WriteMode::Insert => MergeOutcome::AnchorNotFound,
                WriteMode::Replace => MergeOutcome::ReplacementBoundsNotFound,
            };
            ConstructMerge::kept(target, outcome)
        }
    }
}
