//! Tests for the anonymization engine module.

use std::sync::Arc;

use arrow::array::{Array, AsArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;

use crate::compiler::compile_policy;
use crate::errors::AnonymizationError;
use crate::policy::{AnonymizationPolicy, ColumnGeneralization};
use crate::rules::GeneralizationRule;

use super::generalizer::{drop_columns, generalize, GeneralizationPlan};
use super::AnonymizationEngine;

// ============================================================================
// Test Utilities
// ============================================================================

/// Small service-request extract: identifiers, coordinates and two QIs.
fn service_requests() -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("SR_NUMBER", DataType::Utf8, false),
        Field::new("STREET_ADDRESS", DataType::Utf8, true),
        Field::new("ZIP_CODE", DataType::Utf8, true),
        Field::new("WARD", DataType::Int64, true),
        Field::new("LATITUDE", DataType::Float64, true),
        Field::new("X_COORDINATE", DataType::Float64, true),
    ]);
    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(StringArray::from(vec!["SR1", "SR2", "SR3", "SR4", "SR5"])),
            Arc::new(StringArray::from(vec![
                Some("1 N STATE ST"),
                Some("2 N STATE ST"),
                None,
                Some("4 W LAKE ST"),
                Some("5 W LAKE ST"),
            ])),
            Arc::new(StringArray::from(vec![
                Some("60601"),
                Some("60602"),
                Some("NA"),
                Some("60607"),
                None,
            ])),
            Arc::new(Int64Array::from(vec![Some(42), Some(42), Some(42), Some(27), Some(27)])),
            Arc::new(Float64Array::from(vec![
                Some(41.8781),
                Some(41.87814),
                None,
                Some(41.8842),
                Some(41.8839),
            ])),
            Arc::new(Float64Array::from(vec![
                Some(1176000.0),
                Some(1176010.0),
                None,
                Some(1171000.0),
                Some(1171020.0),
            ])),
        ],
    )
    .unwrap()
}

fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

fn policy(k: usize) -> AnonymizationPolicy {
    AnonymizationPolicy::builder(k)
        .with_quasi_identifier("ZIP_CODE")
        .with_quasi_identifier("WARD")
        .with_quasi_identifier("COMMUNITY_AREA")
        .drop_column("STREET_ADDRESS")
        .drop_column("LOCATION")
        .truncate("ZIP_CODE", 3)
        .with_generalization(
            ColumnGeneralization::new("LATITUDE", GeneralizationRule::round(3))
                .superseding(vec!["X_COORDINATE".to_string()]),
        )
        .round("LONGITUDE", 3)
        .build()
        .unwrap()
}

// ============================================================================
// Plan Tests
// ============================================================================

#[test]
fn test_plan_resolves_schema() {
    let batch = service_requests();
    let policy = policy(2);
    let rules = compile_policy(&policy).unwrap();
    let plan = GeneralizationPlan::new(&batch.schema(), &policy, &rules).unwrap();

    assert_eq!(plan.quasi_identifiers(), ["ZIP_CODE", "WARD"]);
    assert_eq!(plan.ignored_quasi_identifiers(), ["COMMUNITY_AREA"]);
    assert_eq!(plan.dropped(), ["STREET_ADDRESS"]);
    assert_eq!(plan.superseded(), ["X_COORDINATE"]);
    assert_eq!(plan.skipped(), ["LONGITUDE"]);
    let applicable: Vec<&str> = plan.applicable().map(|g| g.column.as_str()).collect();
    assert_eq!(applicable, vec!["ZIP_CODE", "LATITUDE"]);
}

#[test]
fn test_plan_strict_mode_requires_every_quasi_identifier() {
    let batch = service_requests();
    let policy = AnonymizationPolicy::builder(2)
        .with_quasi_identifier("ZIP_CODE")
        .with_quasi_identifier("COMMUNITY_AREA")
        .with_strict(true)
        .build()
        .unwrap();
    let err = GeneralizationPlan::new(&batch.schema(), &policy, &[]).unwrap_err();
    assert!(matches!(err, AnonymizationError::MissingColumn(c) if c == "COMMUNITY_AREA"));
}

#[test]
fn test_plan_without_any_quasi_identifier_fails() {
    let batch = service_requests();
    let policy = AnonymizationPolicy::builder(2)
        .with_quasi_identifier("COMMUNITY_AREA")
        .with_quasi_identifier("STREET_ADDRESS")
        .drop_column("STREET_ADDRESS")
        .build()
        .unwrap();
    let err = GeneralizationPlan::new(&batch.schema(), &policy, &[]).unwrap_err();
    match err {
        AnonymizationError::NoQuasiIdentifierPresent(configured) => {
            assert_eq!(configured, vec!["COMMUNITY_AREA", "STREET_ADDRESS"]);
        }
        other => panic!("Expected NoQuasiIdentifierPresent, got {other:?}"),
    }
}

#[test]
fn test_plan_rule_on_superseded_column_is_skipped() {
    let batch = service_requests();
    let policy = AnonymizationPolicy::builder(2)
        .with_quasi_identifier("WARD")
        .with_generalization(
            ColumnGeneralization::new("LATITUDE", GeneralizationRule::round(3))
                .superseding(vec!["X_COORDINATE".to_string()]),
        )
        .round("X_COORDINATE", 0)
        .build()
        .unwrap();
    let rules = compile_policy(&policy).unwrap();
    let plan = GeneralizationPlan::new(&batch.schema(), &policy, &rules).unwrap();
    assert_eq!(plan.skipped(), ["X_COORDINATE"]);
    assert_eq!(plan.applicable().count(), 1);
}

// ============================================================================
// Generalizer Tests
// ============================================================================

#[test]
fn test_drop_columns_ignores_unknown_names() {
    let batch = service_requests();
    let dropped = drop_columns(
        &batch,
        &["STREET_ADDRESS".to_string(), "LOCATION".to_string()],
    )
    .unwrap();
    assert_eq!(dropped.num_columns(), 5);
    assert!(!column_names(&dropped).contains(&"STREET_ADDRESS".to_string()));
}

#[test]
fn test_generalize_replaces_columns_in_place() {
    let batch = service_requests();
    let policy = policy(2);
    let rules = compile_policy(&policy).unwrap();
    let plan = GeneralizationPlan::new(&batch.schema(), &policy, &rules).unwrap();
    let (generalized, report) = generalize(&batch, &plan).unwrap();

    assert_eq!(
        column_names(&generalized),
        vec!["SR_NUMBER", "ZIP_CODE", "WARD", "LATITUDE"]
    );
    assert_eq!(generalized.num_rows(), 5);

    let zips: Vec<Option<&str>> = generalized.column(1).as_string::<i32>().iter().collect();
    assert_eq!(
        zips,
        vec![Some("606"), Some("606"), Some("NAX"), Some("606"), Some("NAX")]
    );

    let latitudes = generalized.column(3).as_primitive::<Float64Type>();
    assert_eq!(latitudes.value(0), 41.878);
    assert_eq!(latitudes.value(1), 41.878);
    assert!(latitudes.is_null(2));
    assert_eq!(latitudes.value(3), 41.884);

    assert_eq!(report.applied.len(), 2);
    assert_eq!(report.applied[0].column, "ZIP_CODE");
    assert_eq!(report.applied[0].missing, 2);
    assert_eq!(report.applied[1].method, "Rounded to 3 decimal places");
    assert_eq!(report.applied[1].missing, 1);
    assert_eq!(report.dropped_columns, vec!["STREET_ADDRESS"]);
    assert_eq!(report.superseded_columns, vec!["X_COORDINATE"]);
    assert_eq!(report.skipped, vec!["LONGITUDE"]);
    assert_eq!(report.ignored_quasi_identifiers, vec!["COMMUNITY_AREA"]);
}

#[test]
fn test_generalize_rejects_unparseable_numbers() {
    let schema = Schema::new(vec![
        Field::new("WARD", DataType::Utf8, false),
        Field::new("LATITUDE", DataType::Utf8, true),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(StringArray::from(vec!["1", "1", "1"])),
            Arc::new(StringArray::from(vec![Some("41.8"), None, Some("north")])),
        ],
    )
    .unwrap();
    let policy = AnonymizationPolicy::builder(2)
        .with_quasi_identifier("WARD")
        .round("LATITUDE", 3)
        .build()
        .unwrap();
    let rules = compile_policy(&policy).unwrap();
    let plan = GeneralizationPlan::new(&batch.schema(), &policy, &rules).unwrap();

    match generalize(&batch, &plan).unwrap_err() {
        AnonymizationError::SchemaError {
            column, row, value, ..
        } => {
            assert_eq!(column, "LATITUDE");
            assert_eq!(row, 2);
            assert_eq!(value, "north");
        }
        other => panic!("Expected SchemaError, got {other:?}"),
    }
}

// ============================================================================
// Engine Tests
// ============================================================================

#[test]
fn test_engine_anonymize() {
    let batch = service_requests();
    let engine = AnonymizationEngine::new(policy(2)).unwrap();
    let result = engine.anonymize(&batch).unwrap();

    // (606, 42) x2 kept, (NAX, 42), (606, 27), (NAX, 27) suppressed
    assert_eq!(result.table.num_rows(), 2);
    let ids: Vec<Option<&str>> = result.table.column(0).as_string::<i32>().iter().collect();
    assert_eq!(ids, vec![Some("SR1"), Some("SR2")]);

    let metrics = &result.metrics;
    assert_eq!(metrics.initial_rows(), 5);
    assert_eq!(metrics.initial_columns(), 6);
    assert_eq!(metrics.final_rows(), 2);
    assert_eq!(metrics.final_columns(), 4);
    assert_eq!(metrics.suppressed_rows(), 3);
    assert_eq!(metrics.num_classes(), 4);
    assert_eq!(metrics.suppressed_classes().len(), 3);
    assert_eq!(metrics.smallest_retained_class(), Some(2));
    assert_eq!(metrics.quasi_identifiers(), ["ZIP_CODE", "WARD"]);
    assert_eq!(metrics.ignored_quasi_identifiers(), ["COMMUNITY_AREA"]);
}

#[test]
fn test_engine_leaves_input_untouched() {
    let batch = service_requests();
    let engine = AnonymizationEngine::new(policy(2)).unwrap();
    let _ = engine.anonymize(&batch).unwrap();

    assert_eq!(batch.num_columns(), 6);
    let zips = batch.column(2).as_string::<i32>();
    assert_eq!(zips.value(0), "60601");
}

#[test]
fn test_engine_suppresses_everything_below_k() {
    let policy = AnonymizationPolicy::builder(5)
        .with_quasi_identifier("ZIP_CODE")
        .build()
        .unwrap();
    let engine = AnonymizationEngine::new(policy).unwrap();
    assert_eq!(engine.policy().k(), 5);

    let batch = service_requests();
    let all_suppressed = engine.anonymize(&batch).unwrap();
    assert_eq!(all_suppressed.table.num_rows(), 0);
    assert_eq!(all_suppressed.metrics.suppressed_rows(), 5);
    assert_eq!(all_suppressed.metrics.final_columns(), 6);
}
