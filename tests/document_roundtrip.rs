//! Canonical text form round-trips and validation gating

use pipebench::core::{
    compile, ActivityOptions, DurationStr, PipelineDocument, PipelineMetadata, RetryPolicy, Step,
    UtilityAction,
};

fn every_step_kind() -> Vec<Step> {
    vec![
        Step::Wallet {
            wallet: "acme-wallet".to_string(),
            version: "2.1".to_string(),
            action: "present-credential".to_string(),
        },
        Step::Credential {
            credential_id: "cred-mdl".to_string(),
        },
        Step::ConformanceCheck {
            standard: "iso-18013-5".to_string(),
            version: "2021".to_string(),
            suite: "proximity".to_string(),
            test: "engagement-qr".to_string(),
        },
        Step::UseCaseVerification {
            use_case_id: "uc-age-check".to_string(),
        },
        Step::Utility(UtilityAction::Email {
            to: "qa@example.test".to_string(),
            subject: "Run finished".to_string(),
            body: "See attached results".to_string(),
        }),
        Step::Utility(UtilityAction::HttpRequest {
            method: "POST".to_string(),
            url: "https://example.test/hook".to_string(),
            body: Some("{\"ok\":true}".to_string()),
        }),
        Step::Utility(UtilityAction::Debug {
            message: "checkpoint".to_string(),
        }),
    ]
}

#[test]
fn test_round_trip_over_every_step_kind() {
    let doc = compile(
        &PipelineMetadata {
            name: "full-coverage".to_string(),
        },
        &ActivityOptions::default(),
        &every_step_kind(),
    );
    assert!(doc.validate().is_empty());

    let text = doc.to_canonical_yaml();
    let parsed = PipelineDocument::from_yaml(&text).unwrap();
    assert_eq!(parsed, doc);
    assert_eq!(parsed.to_canonical_yaml(), text);
}

#[test]
fn test_formatting_differences_collapse_to_identical_bytes() {
    let sloppy = ActivityOptions {
        schedule_to_close_timeout: DurationStr::from("020m"),
        start_to_close_timeout: DurationStr::from("10m"),
        retry_policy: RetryPolicy {
            maximum_attempts: 3,
        },
    };
    let tidy = ActivityOptions::default();

    let metadata = PipelineMetadata {
        name: "canonical".to_string(),
    };
    let a = compile(&metadata, &sloppy, &[]);
    let b = compile(&metadata, &tidy, &[]);
    assert_eq!(a.to_canonical_yaml(), b.to_canonical_yaml());
}

#[test]
fn test_hand_edited_yaml_with_bad_duration_still_parses() {
    // The escape-hatch view must keep editable documents parseable;
    // the bad duration is reported by validation instead
    let yaml = r#"
name: "edited by hand"
runtime:
  temporal:
    activity_options:
      schedule_to_close_timeout: "twenty minutes"
      start_to_close_timeout: "10m"
      retry_policy:
        maximum_attempts: 3
steps: []
"#;

    let doc = PipelineDocument::from_yaml(yaml).unwrap();
    let errors = doc.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].path.ends_with("schedule_to_close_timeout"));

    // Submission is blocked, editing is not
    assert!(doc.clone().validated().is_err());
    assert!(!doc.to_canonical_yaml().is_empty());
}

#[test]
fn test_unknown_step_type_fails_at_parse() {
    let yaml = r#"
name: "future"
runtime:
  temporal:
    activity_options:
      schedule_to_close_timeout: "20m"
      start_to_close_timeout: "10m"
      retry_policy:
        maximum_attempts: 3
steps:
  - type: "teleport"
    destination: "mars"
"#;
    assert!(PipelineDocument::from_yaml(yaml).is_err());
}
