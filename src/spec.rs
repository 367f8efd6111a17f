//! # Merge Specifications
//!
//! A [`MergeSpec`] describes one kind of mergeable construct: an array
//! property, an `implements` list, a block of import statements. It bundles
//! three patterns with the strings used to split and re-join the construct's
//! items.
//!
//! | Pattern       | Capture groups | Used when                         |
//! |---------------|----------------|-----------------------------------|
//! | `detection`   | 1              | reading the item list             |
//! | `replacement` | 2              | the target already has the list   |
//! | `insertion`   | 1              | the target lacks the list         |
//!
//! Capture-group counts are checked by [`MergeSpecBuilder::build`], so a
//! malformed spec is rejected before any merge runs.
//!
//! ## Example
//!
//! ```
//! use scaffold_merge::spec::MergeSpec;
//!
//! let spec = MergeSpec::builder("tags")
//!     .detection(r"tags = \[(.*?)\]")
//!     .replacement(r"(tags = \[).*?(\])")
//!     .insertion(r"(?m)(^\[meta\]\n)")
//!     .detection_separator(",")
//!     .replacement_separator(", ")
//!     .insertion_wrap("tags = [", "]\n")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(spec.name(), "tags");
//! ```

use regex::Regex;

use crate::error::{Error, Result};

/// Immutable description of one mergeable construct.
#[derive(Debug, Clone)]
pub struct MergeSpec {
    name: String,
    detection: Regex,
    replacement: Regex,
    insertion: Regex,
    detection_separator: String,
    replacement_separator: String,
    replacement_prepend: String,
    replacement_append: String,
    insertion_prepend: String,
    insertion_append: String,
    sort_items: bool,
    exclude_items: Vec<String>,
}

impl MergeSpec {
    /// Start building a spec with the given construct name.
    pub fn builder(name: impl Into<String>) -> MergeSpecBuilder {
        MergeSpecBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pattern whose single capture group yields the raw item text.
    pub fn detection(&self) -> &Regex {
        &self.detection
    }

    /// Pattern whose two capture groups bracket an existing item block.
    pub fn replacement(&self) -> &Regex {
        &self.replacement
    }

    /// Pattern whose single capture group is the anchor a new block follows.
    pub fn insertion(&self) -> &Regex {
        &self.insertion
    }

    pub fn detection_separator(&self) -> &str {
        &self.detection_separator
    }

    pub fn replacement_separator(&self) -> &str {
        &self.replacement_separator
    }

    pub fn replacement_prepend(&self) -> &str {
        &self.replacement_prepend
    }

    pub fn replacement_append(&self) -> &str {
        &self.replacement_append
    }

    pub fn insertion_prepend(&self) -> &str {
        &self.insertion_prepend
    }

    pub fn insertion_append(&self) -> &str {
        &self.insertion_append
    }

    pub fn sort_items(&self) -> bool {
        self.sort_items
    }

    pub fn exclude_items(&self) -> &[String] {
        &self.exclude_items
    }

    /// Whether `item` must be dropped from every merged list.
    pub fn is_excluded(&self, item: &str) -> bool {
        self.exclude_items.iter().any(|excluded| excluded == item)
    }

    /// Return a copy of this spec with a different exclusion list.
    ///
    /// Patterns are untouched, so no revalidation is needed.
    pub fn with_exclude_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_items = items.into_iter().map(|item| item.into().trim().to_string()).collect();
        self
    }

    /// Return a copy of this spec with sorting switched on or off.
    pub fn with_sort_items(mut self, sort_items: bool) -> Self {
        self.sort_items = sort_items;
        self
    }
}

/// Builder for [`MergeSpec`]. Patterns are compiled and checked in
/// [`build`](MergeSpecBuilder::build).
#[derive(Debug, Clone)]
pub struct MergeSpecBuilder {
    name: String,
    detection: String,
    replacement: String,
    insertion: String,
    detection_separator: String,
    replacement_separator: String,
    replacement_prepend: String,
    replacement_append: String,
    insertion_prepend: String,
    insertion_append: String,
    sort_items: bool,
    exclude_items: Vec<String>,
}

impl MergeSpecBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detection: String::new(),
            replacement: String::new(),
            insertion: String::new(),
            detection_separator: ",".to_string(),
            replacement_separator: ", ".to_string(),
            replacement_prepend: String::new(),
            replacement_append: String::new(),
            insertion_prepend: String::new(),
            insertion_append: String::new(),
            sort_items: false,
            exclude_items: Vec::new(),
        }
    }

    pub fn detection(mut self, pattern: impl Into<String>) -> Self {
        self.detection = pattern.into();
        self
    }

    pub fn replacement(mut self, pattern: impl Into<String>) -> Self {
        self.replacement = pattern.into();
        self
    }

    pub fn insertion(mut self, pattern: impl Into<String>) -> Self {
        self.insertion = pattern.into();
        self
    }

    pub fn detection_separator(mut self, separator: impl Into<String>) -> Self {
        self.detection_separator = separator.into();
        self
    }

    pub fn replacement_separator(mut self, separator: impl Into<String>) -> Self {
        self.replacement_separator = separator.into();
        self
    }

    /// Strings placed around the joined items when replacing a block.
    pub fn replacement_wrap(mut self, prepend: impl Into<String>, append: impl Into<String>) -> Self {
        self.replacement_prepend = prepend.into();
        self.replacement_append = append.into();
        self
    }

    /// Strings placed around the joined items when inserting a new block.
    pub fn insertion_wrap(mut self, prepend: impl Into<String>, append: impl Into<String>) -> Self {
        self.insertion_prepend = prepend.into();
        self.insertion_append = append.into();
        self
    }

    pub fn sort_items(mut self, sort_items: bool) -> Self {
        self.sort_items = sort_items;
        self
    }

    pub fn exclude_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_items = items.into_iter().map(|item| item.into().trim().to_string()).collect();
        self
    }

    /// Compile the patterns and check their capture-group counts.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedSpec` if a pattern fails to compile, has the
    /// wrong number of capture groups, or if the detection separator is empty.
    pub fn build(self) -> Result<MergeSpec> {
        let detection = compile(&self.name, "detection", &self.detection, 1)?;
        let replacement = compile(&self.name, "replacement", &self.replacement, 2)?;
        let insertion = compile(&self.name, "insertion", &self.insertion, 1)?;

        if self.detection_separator.is_empty() {
            return Err(Error::MalformedSpec {
                spec: self.name,
                message: "detection separator must not be empty".to_string(),
            });
        }

        Ok(MergeSpec {
            name: self.name,
            detection,
            replacement,
            insertion,
            detection_separator: self.detection_separator,
            replacement_separator: self.replacement_separator,
            replacement_prepend: self.replacement_prepend,
            replacement_append: self.replacement_append,
            insertion_prepend: self.insertion_prepend,
            insertion_append: self.insertion_append,
            sort_items: self.sort_items,
            exclude_items: self.exclude_items,
        })
    }
}

fn compile(spec: &str, role: &str, pattern: &str, groups: usize) -> Result<Regex> {
    let regex = Regex::new(pattern).map_err(|err| Error::MalformedSpec {
        spec: spec.to_string(),
        message: format!("{} pattern does not compile: {}", role, err),
    })?;

    // captures_len counts the implicit whole-match group
    let found = regex.captures_len() - 1;
    if found != groups {
        return Err(Error::MalformedSpec {
            spec: spec.to_string(),
            message: format!(
                "{} pattern must have exactly {} capture group{}, found {}",
                role,
                groups,
                if groups == 1 { "" } else { "s" },
                found
            ),
        });
    }

    Ok(regex)
}
