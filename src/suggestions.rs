//! # Error Suggestions
//!
//! Helpers for error messages that say what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Plan file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::plan_not_found(path));
//! ```

use std::path::Path;

/// Generate an error for when the installation plan is not found.
///
/// Includes hints about:
/// - Creating a plan file
/// - Using the -p/--plan flag
/// - Using the SCAFFOLD_PLAN environment variable
pub fn plan_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Plan file not found: {path}\n\n\
         hint: Create a .scaffold.yaml file next to your templates\n\
         hint: Use -p/--plan to specify a different path\n\
         hint: Set SCAFFOLD_PLAN environment variable",
        path = path.display()
    )
}

/// Build a "Did you mean" hint when `input` is close to one of `candidates`.
pub fn did_you_mean(input: &str, candidates: &[&str]) -> Option<String> {
    find_similar(input, candidates).map(|candidate| format!("Did you mean '{}'?", candidate))
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // Single rolling row instead of the full matrix.
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
