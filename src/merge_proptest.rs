//! Property-based tests for the merge engine.
//!
//! These tests use proptest to generate templates and targets and verify
//! that the merge invariants hold for every built-in construct: a second
//! merge changes nothing, merged lists hold no duplicates, nothing the user
//! wrote is lost, and unmatched targets pass through untouched. Each
//! construct excludes one item of its pool, so some cases empty a list.

#[cfg(test)]
mod proptest_tests {
    use std::cmp::Ordering;

    use crate::merge::extract::extract;
    use crate::merge::list::{natural_cmp_ignore_case, natural_sort};
    use crate::merge::{merge_construct, MergeOutcome};
    use crate::presets::Preset;
    use crate::spec::MergeSpec;
    use proptest::prelude::*;

    const PREFIX: &str = "<?php\n\nnamespace App;\n\n";
    const SUFFIX: &str = "    public function keep() {}\n}\n";

    /// Item pool per construct; the last entry is excluded.
    fn pool(preset: Preset) -> [&'static str; 6] {
        match preset {
            Preset::Imports => [
                "use Laravel\\Spark\\Billable;",
                "use Illuminate\\Notifications\\Notifiable;",
                "use App\\Models\\Team2;",
                "use App\\Models\\Team10;",
                "use Illuminate\\Support\\Str;",
                "use Legacy\\Shim;",
            ],
            Preset::Traits => [
                "Notifiable",
                "Billable",
                "CanJoinTeams",
                "HasApiTokens",
                "Authorizable",
                "LegacyShim",
            ],
            Preset::Implements => [
                "Countable",
                "JsonSerializable",
                "ArrayAccess",
                "TwoFactorAuthenticatableContract",
                "CanResetPasswordContract",
                "LegacyContract",
            ],
            Preset::Hidden | Preset::Fillable | Preset::Dates | Preset::Appends => [
                "'password'",
                "'remember_token'",
                "'authy_id'",
                "'api_token'",
                "'card_last_four'",
                "'secret'",
            ],
        }
    }

    fn spec(preset: Preset) -> MergeSpec {
        preset.spec().with_exclude_items([pool(preset)[5]])
    }

    fn indices() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(0..6usize, 1..6)
    }

    fn items(preset: Preset, indices: &[usize]) -> Vec<String> {
        let pool = pool(preset);
        indices.iter().map(|&i| pool[i].to_string()).collect()
    }

    /// A user model with `preset`'s construct holding `items`, or without it.
    fn model(preset: Preset, items: Option<&[String]>) -> String {
        let mut imports = String::new();
        let mut implements = String::new();
        let mut body = String::new();
        if let Some(items) = items {
            match preset {
                Preset::Imports => imports = format!("{}\n\n", items.join("\n")),
                Preset::Implements => implements = format!(" implements {}", items.join(", ")),
                Preset::Traits => body = format!("    use {};\n\n", items.join(", ")),
                _ => {
                    body = format!("    protected ${} = [{}];\n\n", preset.name(), items.join(", "))
                }
            }
        }
        format!(
            "{}{}class User extends Model{}\n{{\n{}{}",
            PREFIX, imports, implements, body, SUFFIX
        )
    }

    /// Deduplicate, keeping first occurrences, and drop the excluded item.
    fn expected(preset: Preset, items: impl IntoIterator<Item = String>) -> Vec<String> {
        let excluded = pool(preset)[5];
        let mut out: Vec<String> = Vec::new();
        for item in items {
            if item != excluded && !out.contains(&item) {
                out.push(item);
            }
        }
        out
    }

    proptest! {
        /// Property: merging the same template twice is a fixed point
        #[test]
        fn merge_is_idempotent(
            template_idx in indices(),
            target_idx in prop::option::of(indices()),
        ) {
            for preset in Preset::USER_MODEL {
                let spec = spec(preset);
                let template = model(preset, Some(items(preset, &template_idx).as_slice()));
                let target_items = target_idx.as_ref().map(|idx| items(preset, idx));
                let first = merge_construct(&spec, &template, &model(preset, target_items.as_deref()));
                let second = merge_construct(&spec, &template, &first.text);

                prop_assert_eq!(&second.text, &first.text, "{} not a fixed point", preset);
                prop_assert!(!second.outcome.is_change(), "{}: second run reported {:?}", preset, second.outcome);
            }
        }

        /// Property: a merged list never holds the same item twice
        #[test]
        fn merged_list_has_no_duplicates(
            template_idx in indices(),
            target_idx in prop::option::of(indices()),
        ) {
            for preset in Preset::USER_MODEL {
                let spec = spec(preset);
                let template = model(preset, Some(items(preset, &template_idx).as_slice()));
                let target_items = target_idx.as_ref().map(|idx| items(preset, idx));
                let merged = merge_construct(&spec, &template, &model(preset, target_items.as_deref()));

                if merged.outcome.is_change() {
                    let written = extract(&spec, &merged.text).unwrap_or_default();
                    let mut unique = written.clone();
                    unique.sort();
                    unique.dedup();
                    prop_assert_eq!(unique.len(), written.len(), "{}: duplicates in {:?}", preset, written);
                }
            }
        }

        /// Property: the merged list is the target's items followed by the new
        /// template items, minus the excluded one
        #[test]
        fn merged_list_is_ordered_union(
            template_idx in indices(),
            target_idx in indices(),
        ) {
            for preset in Preset::USER_MODEL {
                let spec = spec(preset);
                let template_items = items(preset, &template_idx);
                let target_items = items(preset, &target_idx);
                let merged = merge_construct(&spec, &model(preset, Some(template_items.as_slice())), &model(preset, Some(target_items.as_slice())));
                let written = extract(&spec, &merged.text).unwrap_or_default();

                let union = expected(preset, target_items.iter().chain(template_items.iter()).cloned());
                prop_assert_eq!(written, union, "{}", preset);
            }
        }

        /// Property: a fresh insert holds exactly the template's items
        #[test]
        fn insert_holds_template_items(template_idx in indices()) {
            for preset in Preset::USER_MODEL {
                let spec = spec(preset);
                let template_items = items(preset, &template_idx);
                let merged = merge_construct(&spec, &model(preset, Some(template_items.as_slice())), &model(preset, None));
                let mut wanted = expected(preset, template_items.iter().cloned());
                if spec.sort_items() {
                    natural_sort(&mut wanted);
                }

                if wanted.is_empty() {
                    prop_assert_eq!(merged.outcome, MergeOutcome::Unchanged, "{}", preset);
                    prop_assert!(extract(&spec, &merged.text).is_none(), "{} was written", preset);
                } else {
                    prop_assert_eq!(merged.outcome, MergeOutcome::Inserted, "{}", preset);
                    prop_assert_eq!(extract(&spec, &merged.text), Some(wanted), "{}", preset);
                }
            }
        }

        /// Property: text outside the construct survives every merge
        #[test]
        fn merge_preserves_surrounding_text(
            template_idx in indices(),
            target_idx in prop::option::of(indices()),
        ) {
            for preset in Preset::USER_MODEL {
                let spec = spec(preset);
                let template = model(preset, Some(items(preset, &template_idx).as_slice()));
                let target_items = target_idx.as_ref().map(|idx| items(preset, idx));
                let merged = merge_construct(&spec, &template, &model(preset, target_items.as_deref()));

                prop_assert!(merged.text.starts_with(PREFIX), "{}: prefix changed", preset);
                prop_assert!(merged.text.ends_with(SUFFIX), "{}: suffix changed", preset);
                prop_assert!(!merged.text.contains("use ;"), "{}: empty use statement", preset);
                prop_assert!(!merged.text.contains("[\n        ,"), "{}: dangling comma", preset);
            }
        }

        /// Property: a target with no class and no construct is returned verbatim
        #[test]
        fn unmatched_target_is_untouched(
            template_idx in indices(),
            text in "[a-ln-tv-z \n;=]{0,80}",
        ) {
            for preset in Preset::USER_MODEL {
                let template = model(preset, Some(items(preset, &template_idx).as_slice()));
                let merged = merge_construct(&spec(preset), &template, &text);
                prop_assert_eq!(&merged.text, &text);
            }
        }
    }

    proptest! {
        /// Property: natural ordering is reflexive and antisymmetric
        #[test]
        fn natural_cmp_is_consistent(a in "[A-Za-z0-9_\\\\]{0,12}", b in "[A-Za-z0-9_\\\\]{0,12}") {
            prop_assert_eq!(natural_cmp_ignore_case(&a, &a), Ordering::Equal);
            prop_assert_eq!(natural_cmp_ignore_case(&a, &b), natural_cmp_ignore_case(&b, &a).reverse());
        }

        /// Property: sorting an already sorted list changes nothing
        #[test]
        fn natural_sort_is_idempotent(mut list in prop::collection::vec("[A-Za-z0-9]{1,8}", 0..10)) {
            natural_sort(&mut list);
            let once = list.clone();
            natural_sort(&mut list);
            prop_assert_eq!(list, once);
        }
    }
}
