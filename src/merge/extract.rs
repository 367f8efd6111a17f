//! Fragment extraction
//!
//! Locates a construct with a spec's detection pattern and splits its raw
//! text into trimmed items.

use crate::spec::MergeSpec;

/// Extract the item list of `spec`'s construct from `text`.
///
/// Only the first match is considered. Returns `None` when the detection
/// pattern does not match or its capture group did not participate in the
/// match. A construct that is present but empty yields `Some(vec![])`.
pub fn extract(spec: &MergeSpec, text: &str) -> Option<Vec<String>> {
    let captures = spec.detection().captures(text)?;
    let raw = captures.get(1)?;
    Some(split_items(raw.as_str(), spec.detection_separator()))
}

/// Split raw construct text on `separator`, trimming every token and
/// dropping tokens that are empty after trimming (trailing separators).
pub fn split_items(raw: &str, separator: &str) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
