use crate::{
    compiler::{compile_generalization, compile_policy},
    errors::AnonymizationError,
    policy::{AnonymizationPolicy, ColumnGeneralization},
    rules::GeneralizationRule,
};

#[test]
fn test_compile_truncate() {
    let generalization = ColumnGeneralization::new("ZIP_CODE", GeneralizationRule::truncate(3));
    let executable = compile_generalization(&generalization).unwrap();

    assert_eq!(executable.column, "ZIP_CODE");
    assert_eq!(executable.rule.name(), "Truncate");
    assert_eq!(executable.rule.describe(), "3-character prefix mask");
    assert!(executable.supersedes.is_empty());
}

#[test]
fn test_compile_round_with_supersedes() {
    let generalization = ColumnGeneralization::new("LATITUDE", GeneralizationRule::round(3))
        .superseding(vec!["X_COORDINATE".to_string()]);
    let executable = compile_generalization(&generalization).unwrap();

    assert_eq!(executable.rule.name(), "Round");
    assert_eq!(executable.rule.describe(), "Rounded to 3 decimal places");
    assert_eq!(executable.supersedes, vec!["X_COORDINATE".to_string()]);
}

#[test]
fn test_compile_rejects_empty_unknown_token() {
    let generalization = ColumnGeneralization::new(
        "ZIP_CODE",
        GeneralizationRule::Truncate {
            length: 3,
            unknown: String::new(),
            markers: vec![],
        },
    );
    let err = compile_generalization(&generalization).unwrap_err();
    match err {
        AnonymizationError::InvalidRule { rule, column, .. } => {
            assert_eq!(rule, "Truncate");
            assert_eq!(column, "ZIP_CODE");
        }
        other => panic!("Expected InvalidRule, got {other:?}"),
    }
}

#[test]
fn test_compile_rejects_excessive_decimals() {
    let generalization = ColumnGeneralization::new("LATITUDE", GeneralizationRule::round(20));
    assert!(matches!(
        compile_generalization(&generalization),
        Err(AnonymizationError::InvalidRule { .. })
    ));
}

#[test]
fn test_compile_policy_keeps_order() {
    let policy = AnonymizationPolicy::builder(5)
        .with_quasi_identifier("ZIP_CODE")
        .round("LONGITUDE", 3)
        .truncate("ZIP_CODE", 3)
        .round("LATITUDE", 3)
        .build()
        .unwrap();

    let compiled = compile_policy(&policy).unwrap();
    let columns: Vec<&str> = compiled.iter().map(|g| g.column.as_str()).collect();
    assert_eq!(columns, vec!["LONGITUDE", "ZIP_CODE", "LATITUDE"]);
}

#[test]
fn test_compile_rejects_zero_length_and_self_supersede() {
    let zero = ColumnGeneralization::new("ZIP_CODE", GeneralizationRule::truncate(0));
    assert!(matches!(
        compile_generalization(&zero),
        Err(AnonymizationError::InvalidRule { message, .. }) if message.contains("length")
    ));

    let own = ColumnGeneralization::new("LATITUDE", GeneralizationRule::round(3))
        .superseding(vec!["LATITUDE".to_string()]);
    assert!(matches!(
        compile_generalization(&own),
        Err(AnonymizationError::InvalidRule { .. })
    ));
}
