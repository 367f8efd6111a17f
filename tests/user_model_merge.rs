//! Merges the Spark user model template into a stock Laravel user model
//! through the library API and snapshots the result.
//!
//! To update the snapshot after intentional changes:
//! ```bash
//! cargo insta test --accept
//! ```

use scaffold_merge::merge::MergeOutcome;
use scaffold_merge::orchestrator::{orchestrate, MergeStep};
use scaffold_merge::presets::Preset;
use scaffold_merge::spec::MergeSpec;

const TEMPLATE: &str = include_str!("fixtures/spark/stubs/app/User.php");
const TARGET: &str = include_str!("fixtures/laravel/app/User.php");

fn user_model_specs() -> Vec<MergeSpec> {
    Preset::USER_MODEL.iter().map(|preset| preset.spec()).collect()
}

#[test]
fn test_spark_user_model_snapshot() {
    let specs = user_model_specs();
    let steps: Vec<_> = specs.iter().map(|spec| MergeStep::new(spec, TEMPLATE)).collect();

    let merged = orchestrate("app/User.php", TARGET, &steps);

    insta::assert_snapshot!("spark_user_model", merged.text);
}

#[test]
fn test_spark_user_model_outcomes() {
    let specs = user_model_specs();
    let steps: Vec<_> = specs.iter().map(|spec| MergeStep::new(spec, TEMPLATE)).collect();

    let merged = orchestrate("app/User.php", TARGET, &steps);

    let outcomes: Vec<_> = merged
        .steps
        .iter()
        .map(|step| (step.construct.as_str(), step.outcome))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("hidden", MergeOutcome::Replaced),
            ("dates", MergeOutcome::Inserted),
            ("appends", MergeOutcome::Inserted),
            ("fillable", MergeOutcome::NotInTemplate),
            ("implements", MergeOutcome::Inserted),
            ("traits", MergeOutcome::Replaced),
            ("imports", MergeOutcome::Replaced),
        ]
    );
    assert_eq!(merged.degraded().count(), 0);
}

#[test]
fn test_spark_user_model_second_merge_is_noop() {
    let specs = user_model_specs();
    let steps: Vec<_> = specs.iter().map(|spec| MergeStep::new(spec, TEMPLATE)).collect();

    let first = orchestrate("app/User.php", TARGET, &steps);
    let second = orchestrate("app/User.php", &first.text, &steps);

    assert_eq!(second.text, first.text);
    assert!(!second.changed());
}

#[test]
fn test_template_merged_into_itself_is_noop() {
    let specs = user_model_specs();
    let steps: Vec<_> = specs.iter().map(|spec| MergeStep::new(spec, TEMPLATE)).collect();

    let merged = orchestrate("stub", TEMPLATE, &steps);

    assert_eq!(merged.text, TEMPLATE);
}
