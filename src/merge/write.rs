//! Fragment writing
//!
//! Splices a rendered item block into the target text. Everything outside
//! the span located by the spec's insertion or replacement pattern is copied
//! through byte for byte.

use super::WriteMode;
use crate::spec::MergeSpec;

/// Write `block` into `text` using the pattern of `mode`.
///
/// Returns `None` when the pattern does not match; the caller keeps the
/// original text in that case.
pub fn write(text: &str, spec: &MergeSpec, mode: WriteMode, block: &str) -> Option<String> {
    match mode {
        WriteMode::Insert => insert_block(text, spec, block),
        WriteMode::Replace => replace_block(text, spec, block),
    }
}

/// `anchor` becomes `anchor + block`.
fn insert_block(text: &str, spec: &MergeSpec, block: &str) -> Option<String> {
    let captures = spec.insertion().captures(text)?;
    let anchor = captures.get(1)?;

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..anchor.end()]);
    out.push_str(block);
    out.push_str(&text[anchor.end()..]);
    Some(out)
}

/// The whole match becomes `head + block + tail`.
fn replace_block(text: &str, spec: &MergeSpec, block: &str) -> Option<String> {
    let captures = spec.replacement().captures(text)?;
    let whole = captures.get(0)?;
    let head = captures.get(1)?;
    let tail = captures.get(2)?;

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..whole.start()]);
    out.push_str(head.as_str());
    out.push_str(block);
    out.push_str(tail.as_str());
    out.push_str(&text[whole.end()..]);
    Some(out)
}
