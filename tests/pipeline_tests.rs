//! End-to-end tests over files: normalize → split → shuffle, and import.

use std::path::Path;

use approx::assert_abs_diff_eq;
use serde_json::{json, Value};
use tempfile::tempdir;
use tinman_data::data::loader::{load_document, write_document};
use tinman_data::jobs::{self, ShuffleOptions};
use tinman_data::{DatasetDocument, DatasetError, SelectionKind, ShuffleAlgorithm, TransformConfig};

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
}

fn two_row_dataset() -> Value {
    json!({
        "data": [{"columns": [1, 2], "class": 0}, {"columns": [3, 4], "class": 1}],
        "result_map": ["A", "B"],
        "table_info": {"column_names": ["x", "y"]}
    })
}

#[test]
fn normalize_then_split_two_rows() {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("raw.json");
    let normalized = dir.path().join("normalized.json");
    let reduced = dir.path().join("reduced.json");
    write_json(&raw, &two_row_dataset());

    jobs::normalize_file(&TransformConfig::new(&raw, &normalized)).unwrap();
    let doc = load_document(&normalized).unwrap();
    assert_eq!(doc.data[0].columns, vec![0.25, 0.5]);
    assert_eq!(doc.data[1].columns, vec![0.75, 1.0]);

    let config = TransformConfig {
        desired_classes: Some(vec!["B".into()]),
        desired_attributes: Some(vec!["y".into()]),
        ..TransformConfig::new(&normalized, &reduced)
    };
    let summary = jobs::split_file(&config).unwrap();
    assert_eq!(summary.rows, 1);

    let out: Value = serde_json::from_str(&std::fs::read_to_string(&reduced).unwrap()).unwrap();
    assert_eq!(out["data"], json!([{"label": 0, "columns": [1.0]}]));
    assert_eq!(out["result_map"], json!(["B"]));
    assert_eq!(out["table_info"]["column_names"], json!(["y"]));
}

#[test]
fn normalized_output_never_exceeds_one() {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("mnist.json");
    let out = dir.path().join("mnist_norm.json");
    write_json(
        &raw,
        &json!({
            "data": [
                {"label": 2, "columns": [0, 51, 255, 17]},
                {"label": 0, "columns": [128, 0, 3, 254]},
                {"label": 1, "columns": [9, 9, 9, 9]}
            ],
            "result_map": ["0", "1", "2"],
            "table_info": {"table_name": "mnist_train", "query_id": 1, "column_names": ["p0", "p1", "p2", "p3"]}
        }),
    );

    jobs::normalize_file(&TransformConfig::new(&raw, &out)).unwrap();
    let doc = load_document(&out).unwrap();
    let max = doc
        .data
        .iter()
        .flat_map(|r| r.columns.iter().copied())
        .fold(f64::MIN, f64::max);
    assert_abs_diff_eq!(max, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(doc.data[1].columns[0], 128.0 / 255.0, epsilon = 1e-12);
    assert_eq!(doc.len(), 3);
    assert_eq!(doc.table_info.table_name.as_deref(), Some("mnist_train"));
}

#[test]
fn degenerate_input_writes_nothing() {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("zeros.json");
    let out = dir.path().join("zeros_norm.json");
    write_json(
        &raw,
        &json!({
            "data": [{"label": 0, "columns": [0, 0]}],
            "result_map": ["A"],
            "table_info": {"column_names": ["x", "y"]}
        }),
    );

    let err = jobs::normalize_file(&TransformConfig::new(&raw, &out)).unwrap_err();
    assert!(matches!(err, DatasetError::DegenerateInput(_)));
    assert!(!out.exists());
}

#[test]
fn schema_violation_is_reported_before_any_output() {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("ragged.json");
    let out = dir.path().join("ragged_out.json");
    write_json(
        &raw,
        &json!({
            "data": [{"label": 0, "columns": [1, 2, 3]}],
            "result_map": ["A"],
            "table_info": {"column_names": ["x", "y"]}
        }),
    );

    let err = jobs::shuffle_file(&TransformConfig::new(&raw, &out), ShuffleOptions::default()).unwrap_err();
    assert!(matches!(err, DatasetError::SchemaViolation(_)));
    assert!(!out.exists());
}

#[test]
fn split_with_unknown_attribute_fails() {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("raw.json");
    write_json(&raw, &two_row_dataset());

    let config = TransformConfig {
        desired_attributes: Some(vec!["z".into()]),
        ..TransformConfig::new(&raw, dir.path().join("never.json"))
    };
    match jobs::split_file(&config) {
        Err(DatasetError::SelectionNotFound { kind, name }) => {
            assert_eq!(kind, SelectionKind::Attribute);
            assert_eq!(name, "z");
        }
        other => panic!("expected SelectionNotFound, got {other:?}"),
    }
}

#[test]
fn shuffle_in_place_keeps_every_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train.json");
    let rows: Vec<Value> = (0..40)
        .map(|i| json!({"label": i % 3, "columns": [i as f64, 1.0]}))
        .collect();
    write_json(
        &path,
        &json!({
            "data": rows,
            "result_map": ["a", "b", "c"],
            "table_info": {"column_names": ["id", "bias"]}
        }),
    );
    let before = load_document(&path).unwrap();

    for algorithm in [ShuffleAlgorithm::FisherYates, ShuffleAlgorithm::FullRangeSwap] {
        let options = ShuffleOptions {
            algorithm,
            seed: Some(11),
        };
        jobs::shuffle_file(&TransformConfig::new(&path, &path), options).unwrap();
        let after = load_document(&path).unwrap();
        assert_eq!(after.len(), before.len());

        let mut ids: Vec<f64> = after.data.iter().map(|r| r.columns[0]).collect();
        ids.sort_by(f64::total_cmp);
        assert_eq!(ids, (0..40).map(|i| i as f64).collect::<Vec<_>>());
        assert!(after.data.iter().all(|r| r.label == (r.columns[0] as usize) % 3));
    }
}

#[test]
fn import_csv_then_split() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("iris.csv");
    let imported = dir.path().join("iris.json");
    let reduced = dir.path().join("setosa_versicolor_iris.json");
    std::fs::write(
        &csv_path,
        "sepal_length,sepal_width,petal_length,petal_width,species\n\
         5.1,3.5,1.4,0.2,Iris_setosa\n\
         7.0,3.2,4.7,1.4,Iris_versicolor\n\
         6.3,3.3,6.0,2.5,Iris_virginica\n\
         4.9,3.0,1.4,0.2,Iris_setosa\n",
    )
    .unwrap();

    jobs::import_file(&TransformConfig::new(&csv_path, &imported), "species").unwrap();
    let config = TransformConfig {
        desired_classes: Some(vec!["Iris_setosa".into(), "Iris_versicolor".into()]),
        desired_attributes: Some(vec!["sepal_length".into(), "petal_length".into()]),
        ..TransformConfig::new(&imported, &reduced)
    };
    jobs::split_file(&config).unwrap();

    let doc = load_document(&reduced).unwrap();
    assert_eq!(doc.result_map, vec!["Iris_setosa", "Iris_versicolor"]);
    assert_eq!(doc.column_names(), ["sepal_length", "petal_length"]);
    assert_eq!(doc.len(), 3);
    assert!(doc.data.iter().all(|r| r.columns.len() == 2));
    assert_eq!(doc.data[1].columns, vec![7.0, 4.7]);
}

#[test]
fn inspect_reports_class_counts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let doc = DatasetDocument::from_json(two_row_dataset()).unwrap();
    write_document(&path, &doc).unwrap();

    let summary = jobs::inspect_file(&path).unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.columns, 2);
    assert_eq!(summary.class_counts, vec![("A".to_string(), 1), ("B".to_string(), 1)]);
    assert_eq!(summary.value_range, Some((1.0, 4.0)));
}
