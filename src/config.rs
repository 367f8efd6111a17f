//! # Installation Plan Schema and Parsing
//!
//! This module defines the data structures behind the `.scaffold.yaml`
//! installation plan and the logic for parsing it. A plan is a list of
//! steps; each step is a single-key mapping naming the step kind.
//!
//! ```yaml
//! - copy:
//!     from: stubs/app/Providers/SparkServiceProvider.php
//!     to: app/Providers/SparkServiceProvider.php
//! - merge:
//!     template: stubs/app/User.php
//!     target: app/User.php
//!     constructs:
//!       - hidden
//!       - { preset: implements, exclude: [AuthenticatableContract] }
//!       - { property: casts }
//! - namespace:
//!     reference: app/User.php
//!     files: ["app/Providers/*.php"]
//! - ensure-line:
//!     file: config/app.php
//!     after: "App\\Providers\\RouteServiceProvider::class,\n"
//!     line: "        App\\Providers\\SparkServiceProvider::class,\n"
//! - env:
//!     vars: [STRIPE_KEY, STRIPE_SECRET]
//! ```
//!
//! ## Key Components
//!
//! - **`Plan`**: A type alias for `Vec<Operation>`.
//! - **`Operation`**: One installation step.
//! - **`ConstructConfig`**: A construct to merge, either a preset name or a
//!   mapping that tweaks a preset or declares a custom [`MergeSpec`].
//!
//! Parsing resolves every construct and compiles every pattern, so a plan
//! with a malformed merge spec is rejected before anything is touched.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::namespace::NamespaceRewriter;
use crate::presets::{self, Preset};
use crate::spec::MergeSpec;
use crate::suggestions;

/// Default plan file name
pub const DEFAULT_PLAN_FILE: &str = ".scaffold.yaml";

/// Step kinds, as written in the plan.
pub const STEP_KINDS: [&str; 5] = ["copy", "merge", "namespace", "ensure-line", "env"];

/// Copy step configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyOp {
    /// Stub path, relative to the template root.
    pub from: String,
    /// Destination path, relative to the project root.
    pub to: String,
    /// Replace the destination when it already exists.
    #[serde(default)]
    pub overwrite: bool,
}

/// Merge step configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeOp {
    /// Template path, relative to the template root.
    pub template: String,
    /// File to merge into, relative to the project root.
    pub target: String,
    /// Constructs to merge, in order.
    pub constructs: Vec<ConstructConfig>,
}

/// A construct reference inside a merge step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstructConfig {
    /// A bare preset name, e.g. `hidden`.
    Preset(Preset),
    /// A preset with overrides, an array property, or a custom spec.
    Detailed(ConstructDef),
}

/// Detailed construct definition.
///
/// Exactly one of `preset`, `property`, or the three patterns must be given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConstructDef {
    #[serde(default)]
    pub preset: Option<Preset>,
    /// Name of a PHP array property, e.g. `casts`.
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub detection: Option<String>,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub insertion: Option<String>,
    #[serde(default)]
    pub detection_separator: Option<String>,
    #[serde(default)]
    pub replacement_separator: Option<String>,
    #[serde(default)]
    pub replacement_prepend: Option<String>,
    #[serde(default)]
    pub replacement_append: Option<String>,
    #[serde(default)]
    pub insertion_prepend: Option<String>,
    #[serde(default)]
    pub insertion_append: Option<String>,
    /// Override natural sorting of freshly inserted lists.
    #[serde(default)]
    pub sort: Option<bool>,
    /// Override the items dropped from every merged list.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

/// Namespace rewrite step configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceOp {
    /// Project file declaring the namespace.
    pub reference: String,
    /// Glob patterns (relative to the project root) of files to rewrite.
    pub files: Vec<String>,
    /// Pattern with one capture group locating the namespace.
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Ensure-line step configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnsureLineOp {
    pub file: String,
    /// Text the line is inserted after (first occurrence).
    pub after: String,
    /// Text to insert; nothing happens when the file already contains it.
    pub line: String,
}

/// Environment file step configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvOp {
    #[serde(default = "default_env_file")]
    pub file: String,
    /// Variable names to declare with an empty value.
    pub vars: Vec<String>,
}

/// Get the default environment file name
///
/// # Examples
///
/// ```
/// use scaffold_merge::config::default_env_file;
///
/// assert_eq!(default_env_file(), ".env");
/// ```
pub fn default_env_file() -> String {
    ".env".to_string()
}

/// All possible step types in a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operation {
    /// Copy a stub file into the project.
    Copy { copy: CopyOp },
    /// Merge constructs from a template into a project file.
    Merge { merge: MergeOp },
    /// Replace namespace placeholders in project files.
    Namespace { namespace: NamespaceOp },
    /// Insert a line after an anchor unless it is already present.
    EnsureLine {
        #[serde(rename = "ensure-line")]
        ensure_line: EnsureLineOp,
    },
    /// Declare environment variables.
    Env { env: EnvOp },
}

impl Operation {
    /// Step kind as written in the plan.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Copy { .. } => "copy",
            Operation::Merge { .. } => "merge",
            Operation::Namespace { .. } => "namespace",
            Operation::EnsureLine { .. } => "ensure-line",
            Operation::Env { .. } => "env",
        }
    }
}

/// The complete plan, represented as a list of steps.
pub type Plan = Vec<Operation>;

impl ConstructConfig {
    /// Resolve this reference into a ready-to-use [`MergeSpec`].
    pub fn resolve(&self) -> Result<MergeSpec> {
        match self {
            ConstructConfig::Preset(preset) => Ok(preset.spec()),
            ConstructConfig::Detailed(def) => def.resolve(),
        }
    }
}

impl ConstructDef {
    fn has_custom_fields(&self) -> bool {
        [
            &self.detection,
            &self.replacement,
            &self.insertion,
            &self.detection_separator,
            &self.replacement_separator,
            &self.replacement_prepend,
            &self.replacement_append,
            &self.insertion_prepend,
            &self.insertion_append,
        ]
        .iter()
        .any(|field| field.is_some())
    }

    fn resolve(&self) -> Result<MergeSpec> {
        let base = match (self.preset, &self.property) {
            (Some(_), Some(_)) => {
                return Err(Error::ConfigParse {
                    message: "A construct cannot set both 'preset' and 'property'".to_string(),
                    hint: None,
                })
            }
            (Some(preset), None) => {
                self.reject_custom_fields(preset.name())?;
                Some(preset.spec())
            }
            (None, Some(property)) => {
                self.reject_custom_fields(property)?;
                Some(presets::array_property(property)?)
            }
            (None, None) => None,
        };

        let spec = match base {
            Some(spec) => spec,
            None => self.build_custom()?,
        };

        let spec = match &self.exclude {
            Some(exclude) => spec.with_exclude_items(exclude.iter().cloned()),
            None => spec,
        };
        Ok(match self.sort {
            Some(sort) => spec.with_sort_items(sort),
            None => spec,
        })
    }

    /// Presets and properties own their patterns; only `sort` and `exclude`
    /// may be overridden.
    fn reject_custom_fields(&self, base: &str) -> Result<()> {
        if self.has_custom_fields() || self.name.is_some() {
            return Err(Error::ConfigParse {
                message: format!("Construct '{}' cannot override patterns or formatting", base),
                hint: Some("Only 'sort' and 'exclude' can be set next to 'preset' or 'property'".to_string()),
            });
        }
        Ok(())
    }

    fn build_custom(&self) -> Result<MergeSpec> {
        let name = self.name.clone().ok_or_else(|| Error::ConfigParse {
            message: "A custom construct needs a 'name'".to_string(),
            hint: Some("Use 'preset: <name>' for a built-in construct".to_string()),
        })?;

        let required = |field: &Option<String>, key: &str| {
            field.clone().ok_or_else(|| Error::ConfigParse {
                message: format!("Custom construct '{}' is missing '{}'", name, key),
                hint: Some("Custom constructs need 'detection', 'replacement' and 'insertion'".to_string()),
            })
        };

        let mut builder = MergeSpec::builder(name.clone())
            .detection(required(&self.detection, "detection")?)
            .replacement(required(&self.replacement, "replacement")?)
            .insertion(required(&self.insertion, "insertion")?)
            .replacement_wrap(
                self.replacement_prepend.clone().unwrap_or_default(),
                self.replacement_append.clone().unwrap_or_default(),
            )
            .insertion_wrap(
                self.insertion_prepend.clone().unwrap_or_default(),
                self.insertion_append.clone().unwrap_or_default(),
            );

        if let Some(separator) = &self.detection_separator {
            builder = builder.detection_separator(separator.clone());
        }
        if let Some(separator) = &self.replacement_separator {
            builder = builder.replacement_separator(separator.clone());
        }

        builder.build()
    }
}

impl MergeOp {
    /// Resolve every construct of this step.
    pub fn specs(&self) -> Result<Vec<MergeSpec>> {
        self.constructs.iter().map(ConstructConfig::resolve).collect()
    }
}

impl NamespaceOp {
    pub fn rewriter(&self) -> Result<NamespaceRewriter> {
        match &self.pattern {
            Some(pattern) => NamespaceRewriter::with_pattern(pattern),
            None => Ok(NamespaceRewriter::default()),
        }
    }
}

/// Parses a YAML string into a validated `Plan`.
pub fn parse(yaml_content: &str) -> Result<Plan> {
    let raw_values: Vec<serde_yaml::Value> = serde_yaml::from_str(yaml_content)?;

    let mut plan = Vec::with_capacity(raw_values.len());
    for (index, value) in raw_values.into_iter().enumerate() {
        let operation = convert_step(value).map_err(|err| match err {
            Error::ConfigParse { message, hint } => Error::ConfigParse {
                message: format!("step {}: {}", index + 1, message),
                hint,
            },
            other => other,
        })?;
        plan.push(operation);
    }

    validate(&plan)?;
    Ok(plan)
}

/// Reads and parses a plan file.
pub fn from_file(path: &Path) -> Result<Plan> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Convert one raw YAML step into an `Operation`.
fn convert_step(value: serde_yaml::Value) -> Result<Operation> {
    let serde_yaml::Value::Mapping(map) = value else {
        return Err(Error::ConfigParse {
            message: "Expected a mapping with a single step kind".to_string(),
            hint: Some(format!("Valid steps: {}", STEP_KINDS.join(", "))),
        });
    };

    if map.len() != 1 {
        return Err(Error::ConfigParse {
            message: format!("Expected exactly one step kind per entry, found {}", map.len()),
            hint: Some("Start a new list item (-) for each step".to_string()),
        });
    }

    let Some((key, body)) = map.into_iter().next() else {
        return Err(Error::ConfigParse {
            message: "Empty step mapping".to_string(),
            hint: None,
        });
    };

    let kind = key.as_str().ok_or_else(|| Error::ConfigParse {
        message: "Step kind must be a string".to_string(),
        hint: None,
    })?;

    let operation = match kind {
        "copy" => Operation::Copy {
            copy: step_body(kind, body)?,
        },
        "merge" => Operation::Merge {
            merge: step_body(kind, body)?,
        },
        "namespace" => Operation::Namespace {
            namespace: step_body(kind, body)?,
        },
        "ensure-line" => Operation::EnsureLine {
            ensure_line: step_body(kind, body)?,
        },
        "env" => Operation::Env {
            env: step_body(kind, body)?,
        },
        unknown => {
            let valid = format!("Valid steps: {}", STEP_KINDS.join(", "));
            return Err(Error::ConfigParse {
                message: format!("Unknown step '{}'", unknown),
                hint: Some(match suggestions::did_you_mean(unknown, &STEP_KINDS) {
                    Some(guess) => format!("{} {}", guess, valid),
                    None => valid,
                }),
            });
        }
    };

    Ok(operation)
}

fn step_body<T: serde::de::DeserializeOwned>(kind: &str, body: serde_yaml::Value) -> Result<T> {
    serde_yaml::from_value(body).map_err(|err| Error::ConfigParse {
        message: format!("Invalid '{}' step: {}", kind, err),
        hint: None,
    })
}

/// Check everything that can be checked without touching the filesystem:
/// construct specs, namespace patterns and glob patterns.
pub fn validate(plan: &Plan) -> Result<()> {
    for operation in plan {
        match operation {
            Operation::Merge { merge } => {
                merge.specs()?;
            }
            Operation::Namespace { namespace } => {
                namespace.rewriter()?;
                for pattern in &namespace.files {
                    glob::Pattern::new(pattern)?;
                }
            }
            Operation::Env { env } => {
                if env.vars.is_empty() {
                    return Err(Error::ConfigParse {
                        message: format!("Env step for '{}' lists no variables", env.file),
                        hint: Some("Add at least one name under 'vars'".to_string()),
                    });
                }
                if let Some(bad) = env.vars.iter().find(|var| !is_env_name(var)) {
                    return Err(Error::ConfigParse {
                        message: format!("Invalid environment variable name '{}'", bad),
                        hint: Some("Use letters, digits and underscores only".to_string()),
                    });
                }
            }
            Operation::Copy { .. } | Operation::EnsureLine { .. } => {}
        }
    }
    Ok(())
}

fn is_env_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
