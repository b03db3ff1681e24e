//! Writes a synthetic Iris-like table to Parquet for trying out `import`.
//!
//! Usage: `generate_sample [OUTPUT]` (default `sample_iris.parquet`).

use std::path::PathBuf;

use anyhow::Result;
use tinman_data::data::loader::DEFAULT_LABEL_COLUMN;
use tinman_data::data::sample::{iris_batch, write_parquet, FEATURES};

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_iris.parquet"));

    let batch = iris_batch(42)?;
    write_parquet(&output_path, &batch)?;

    println!(
        "Wrote {} rows ({} features, label column '{DEFAULT_LABEL_COLUMN}') to {}",
        batch.num_rows(),
        FEATURES.len(),
        output_path.display()
    );
    Ok(())
}
