//! Synthetic Iris-like table used by the `generate_sample` binary.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::loader::DEFAULT_LABEL_COLUMN;

pub const FEATURES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];
pub const ROWS_PER_CLASS: usize = 50;

/// Per-class (mean, std-dev) of each feature, in `FEATURES` order.
const SPECIES: [(&str, [(f64, f64); 4]); 3] = [
    ("Iris_setosa", [(5.0, 0.35), (3.4, 0.38), (1.5, 0.17), (0.2, 0.1)]),
    ("Iris_versicolor", [(5.9, 0.52), (2.8, 0.31), (4.3, 0.47), (1.3, 0.2)]),
    ("Iris_virginica", [(6.6, 0.64), (3.0, 0.32), (5.6, 0.55), (2.0, 0.27)]),
];

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Build the table: one Float64 column per feature plus a Utf8 label column
/// named [`DEFAULT_LABEL_COLUMN`], so `import` reads it without extra flags.
pub fn iris_batch(seed: u64) -> Result<RecordBatch> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut features: Vec<Vec<f64>> = vec![Vec::new(); FEATURES.len()];
    let mut species: Vec<&str> = Vec::new();

    for (name, stats) in &SPECIES {
        for _ in 0..ROWS_PER_CLASS {
            for (col, &(mean, std_dev)) in features.iter_mut().zip(stats.iter()) {
                // measurements are positive and recorded to one decimal
                let v = gauss(&mut rng, mean, std_dev).max(0.1);
                col.push((v * 10.0).round() / 10.0);
            }
            species.push(*name);
        }
    }

    let mut fields: Vec<Field> = FEATURES
        .iter()
        .map(|name| Field::new(*name, DataType::Float64, false))
        .collect();
    fields.push(Field::new(DEFAULT_LABEL_COLUMN, DataType::Utf8, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = features
        .into_iter()
        .map(|col| Arc::new(Float64Array::from(col)) as ArrayRef)
        .collect();
    columns.push(Arc::new(StringArray::from(species)));

    RecordBatch::try_new(schema, columns).context("building record batch")
}

/// Write a single batch as a Parquet file.
pub fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use tempfile::tempdir;

    #[test]
    fn sample_imports_with_default_label_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample_iris.parquet");
        write_parquet(&path, &iris_batch(42).unwrap()).unwrap();

        let doc = load_file(&path, DEFAULT_LABEL_COLUMN).unwrap();
        assert_eq!(doc.len(), 3 * ROWS_PER_CLASS);
        assert_eq!(doc.column_names(), FEATURES);
        assert_eq!(doc.result_map, vec!["Iris_setosa", "Iris_versicolor", "Iris_virginica"]);
        assert!(doc.data.iter().flat_map(|r| r.columns.iter()).all(|&v| v >= 0.1));
    }

    #[test]
    fn same_seed_same_table() {
        assert_eq!(iris_batch(7).unwrap(), iris_batch(7).unwrap());
    }
}
