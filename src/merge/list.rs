//! List merging
//!
//! Combines a template's items with a target's items under a spec's
//! ordering, deduplication and exclusion rules.
//!
//! - Target construct absent: the template items are (optionally) sorted
//!   naturally, deduplicated and filtered, then written with the insertion
//!   pattern.
//! - Target construct present: target items come first in their existing
//!   order, new template items are appended, then the list is deduplicated
//!   and filtered. Sorting never reorders an existing target list.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use super::WriteMode;
use crate::spec::MergeSpec;

/// The merged item list together with the write path it must take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedList {
    pub items: Vec<String>,
    pub mode: WriteMode,
}

impl MergedList {
    /// Join the items with the replacement separator and wrap them with the
    /// prepend/append strings of the list's write mode.
    ///
    /// An emptied list on the replacement path renders as nothing, so the
    /// replacement head and tail close up around it.
    pub fn render(&self, spec: &MergeSpec) -> String {
        if self.items.is_empty() && self.mode == WriteMode::Replace {
            return String::new();
        }
        let (prepend, append) = match self.mode {
            WriteMode::Insert => (spec.insertion_prepend(), spec.insertion_append()),
            WriteMode::Replace => (spec.replacement_prepend(), spec.replacement_append()),
        };
        format!(
            "{}{}{}",
            prepend,
            self.items.join(spec.replacement_separator()),
            append
        )
    }
}

/// Merge template items into the target's items.
///
/// `target` is `None` when the construct was not found in the target text.
pub fn merge_items(template: &[String], target: Option<&[String]>, spec: &MergeSpec) -> MergedList {
    match target {
        None => {
            let mut fresh = template.to_vec();
            if spec.sort_items() {
                natural_sort(&mut fresh);
            }
            MergedList {
                items: finish(fresh.iter(), spec),
                mode: WriteMode::Insert,
            }
        }
        Some(existing) => MergedList {
            items: finish(existing.iter().chain(template.iter()), spec),
            mode: WriteMode::Replace,
        },
    }
}

/// Deduplicate (first occurrence wins) and drop excluded items.
fn finish<'a>(items: impl Iterator<Item = &'a String>, spec: &MergeSpec) -> Vec<String> {
    let mut seen: HashSet<&String> = HashSet::new();
    items
        .filter(|item| !spec.is_excluded(item))
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}

/// Stable, natural, case-insensitive sort.
pub fn natural_sort(items: &mut [String]) {
    items.sort_by(|a, b| natural_cmp_ignore_case(a, b));
}

/// Compare two strings the way a person orders file names: runs of digits
/// compare by numeric value, everything else compares by lowercase.
pub fn natural_cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        let (lc, rc) = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(lc), Some(rc)) => (lc, rc),
        };

        let ordering = if lc.is_ascii_digit() && rc.is_ascii_digit() {
            compare_digit_runs(&take_digits(&mut left), &take_digits(&mut right))
        } else {
            left.next();
            right.next();
            lc.to_lowercase().cmp(rc.to_lowercase())
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
