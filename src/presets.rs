//! # Built-in Merge Specifications
//!
//! Pattern sets for the constructs a scaffolded PHP user model carries:
//!
//! - `imports` - the block of top-level `use Vendor\Class;` statements
//! - `traits` - the `use TraitA, TraitB;` line inside the class body
//! - `implements` - the class's `implements` list
//! - `hidden`, `fillable`, `dates`, `appends` - array properties
//!
//! Any other array property can be targeted with [`array_property`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::spec::MergeSpec;
use crate::suggestions;

/// Matches the opening line(s) of a class declaration through its `{`.
const CLASS_BODY_ANCHOR: &str = r"(?m)(^(?:abstract\s+|final\s+)?class\s+[^{]*\{[ \t]*\n)";

/// Matches a class declaration head up to (not including) `implements` or `{`.
const CLASS_HEAD: &str = r"^(?:abstract\s+|final\s+)?class\s+\w+(?:\s+extends\s+[\w\\]+)?";

/// Indentation of class members.
const MEMBER_INDENT: &str = "    ";

/// Indentation of array items inside a class member.
const ITEM_INDENT: &str = "        ";

/// A built-in construct kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Imports,
    Traits,
    Implements,
    Hidden,
    Fillable,
    Dates,
    Appends,
}

impl Preset {
    /// Every preset, in the order a user model is merged.
    pub const USER_MODEL: [Preset; 7] = [
        Preset::Hidden,
        Preset::Dates,
        Preset::Appends,
        Preset::Fillable,
        Preset::Implements,
        Preset::Traits,
        Preset::Imports,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Imports => "imports",
            Preset::Traits => "traits",
            Preset::Implements => "implements",
            Preset::Hidden => "hidden",
            Preset::Fillable => "fillable",
            Preset::Dates => "dates",
            Preset::Appends => "appends",
        }
    }

    /// Build the spec for this preset.
    pub fn spec(&self) -> MergeSpec {
        let built = match self {
            Preset::Imports => imports(),
            Preset::Traits => traits(),
            Preset::Implements => implements(),
            Preset::Hidden | Preset::Fillable | Preset::Dates | Preset::Appends => {
                array_property(self.name())
            }
        };
        // Preset patterns are constants covered by the tests below.
        built.expect("built-in merge spec is valid")
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Preset::USER_MODEL
            .iter()
            .copied()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| {
                let names = Preset::USER_MODEL.map(|p| p.name());
                let valid = format!("Valid presets: {}", names.join(", "));
                Error::ConfigParse {
                    message: format!("Unknown merge preset '{}'", s),
                    hint: Some(match suggestions::did_you_mean(s, &names) {
                        Some(guess) => format!("{} {}", guess, valid),
                        None => valid,
                    }),
                }
            })
    }
}

/// Spec for a PHP array property such as `protected $casts = [...];`.
///
/// A missing property is inserted at the top of the class body.
pub fn array_property(property: &str) -> Result<MergeSpec> {
    let name = regex::escape(property);
    let visibility = r"(?:protected|public|private)(?:\s+static)?";

    MergeSpec::builder(property)
        .detection(format!(r"(?s){}\s+\${}\s*=\s*\[(.*?)\]\s*;", visibility, name))
        .replacement(format!(r"(?s)({}\s+\${}\s*=\s*\[).*?(\]\s*;)", visibility, name))
        .insertion(CLASS_BODY_ANCHOR)
        .detection_separator(",")
        .replacement_separator(format!(",\n{}", ITEM_INDENT))
        .replacement_wrap(format!("\n{}", ITEM_INDENT), format!(",\n{}", MEMBER_INDENT))
        .insertion_wrap(
            format!("{}protected ${} = [\n{}", MEMBER_INDENT, property, ITEM_INDENT),
            format!(",\n{}];\n\n", MEMBER_INDENT),
        )
        .build()
}

/// The `implements` keyword belongs to the block, so an emptied list drops
/// the whole clause. Insertion requires the head to run straight into the
/// body brace; a head with an unrecognised clause has no anchor.
fn implements() -> Result<MergeSpec> {
    MergeSpec::builder("implements")
        .detection(format!(r"(?m){}\s+implements\s+([\w\\,\s]+?)\s*\{{", CLASS_HEAD))
        .replacement(format!(r"(?m)({})\s+implements\s+[\w\\,\s]+?(\s*\{{)", CLASS_HEAD))
        .insertion(format!(r"(?m)({})\s*\{{", CLASS_HEAD))
        .detection_separator(",")
        .replacement_separator(", ")
        .replacement_wrap(" implements ", "")
        .insertion_wrap(" implements ", "")
        .build()
}

fn traits() -> Result<MergeSpec> {
    let list = r"[\w\\]+(?:\s*,\s*[\w\\]+)*";

    MergeSpec::builder("traits")
        .detection(format!(r"(?m)^[ \t]+use\s+({})\s*;", list))
        .replacement(format!(r"(?m)^()[ \t]+use\s+{}\s*;[ \t]*(?:\n|\z)()", list))
        .insertion(CLASS_BODY_ANCHOR)
        .detection_separator(",")
        .replacement_separator(", ")
        .replacement_wrap(format!("{}use ", MEMBER_INDENT), ";\n")
        .insertion_wrap(format!("{}use ", MEMBER_INDENT), ";\n\n")
        .build()
}

/// Top-level imports, including groups separated by blank lines. A rewrite
/// joins the groups into one block.
fn imports() -> Result<MergeSpec> {
    let statement = r"use[ \t]+[^;\n]+;[ \t]*\n";
    let run = format!(r"{0}(?:(?:[ \t]*\n)*{0})*", statement);

    MergeSpec::builder("imports")
        .detection(format!(r"(?m)^({})", run))
        .replacement(format!(r"(?m)^(){}()", run))
        .insertion(r"(?m)(^namespace\s+[\w\\]+\s*;[ \t]*\n)")
        .detection_separator("\n")
        .replacement_separator("\n")
        .replacement_wrap("", "\n")
        .insertion_wrap("\n", "\n")
        .sort_items(true)
        .build()
}
