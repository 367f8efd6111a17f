//! Namespace rewriting for copied stubs
//!
//! Stubs ship with placeholder tokens in place of the application's root
//! namespace. The real namespace is read from a reference file in the
//! project (for example the user model) and substituted into each stub.

use regex::Regex;

use crate::error::{Error, Result};

/// Placeholder used as a namespace prefix, e.g. `DummyRootNamespace\Models`.
pub const ROOT_NAMESPACE_PREFIX: &str = "DummyRootNamespace\\";

/// Placeholder used as a standalone identifier, e.g. `namespace DummyRootNamespace;`.
pub const ROOT_NAMESPACE: &str = "DummyRootNamespace";

/// Default pattern locating a PHP namespace declaration.
pub const DEFAULT_NAMESPACE_PATTERN: &str = r"(?m)^namespace\s+([\w\\]+)\s*;";

/// Rewrites placeholder namespace tokens using a declared namespace.
#[derive(Debug, Clone)]
pub struct NamespaceRewriter {
    pattern: Regex,
}

impl Default for NamespaceRewriter {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_NAMESPACE_PATTERN).expect("default namespace pattern is valid"),
        }
    }
}

impl NamespaceRewriter {
    /// Build a rewriter with a custom detection pattern. The namespace is
    /// read from the pattern's first capture group.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)?;
        // captures_len counts the implicit whole-match group
        let found = pattern.captures_len() - 1;
        if found != 1 {
            return Err(Error::MalformedSpec {
                spec: "namespace".to_string(),
                message: format!("namespace pattern needs exactly 1 capture group, found {}", found),
            });
        }
        Ok(Self { pattern })
    }

    /// The namespace declared in `reference`, if any.
    pub fn detect<'t>(&self, reference: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(reference)
            .and_then(|captures| captures.get(1))
            .map(|namespace| namespace.as_str().trim())
            .filter(|namespace| !namespace.is_empty())
    }

    /// Replace both placeholder tokens in `target` with the namespace
    /// declared in `reference`. Without a declaration `target` is returned
    /// as is.
    pub fn rewrite(&self, reference: &str, target: &str) -> String {
        match self.detect(reference) {
            Some(namespace) => target
                .replace(ROOT_NAMESPACE_PREFIX, &format!("{}\\", namespace))
                .replace(ROOT_NAMESPACE, namespace),
            None => target.to_string(),
        }
    }
}

/// Rewrite placeholder namespaces in `target` with the default PHP pattern.
pub fn rewrite_namespace(reference: &str, target: &str) -> String {
    NamespaceRewriter::default().rewrite(reference, target)
}
