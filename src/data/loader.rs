use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{DatasetDocument, Row};
use crate::error::{DatasetError, Result};

/// Label column assumed by `import` when none is given.
pub const DEFAULT_LABEL_COLUMN: &str = "label";

/// `table_info.query_id` given to imported tables, which come from a file
/// rather than a database query.
pub const IMPORTED_QUERY_ID: u64 = 0;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – a dataset document
/// * `.csv`     – header row; `label_column` holds class names, the rest are features
/// * `.parquet` – same layout as CSV, numeric feature columns
pub fn load_file(path: &Path, label_column: &str) -> Result<DatasetDocument> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "json" => return load_document(path),
        "csv" => load_csv(path, label_column),
        "parquet" | "pq" => load_parquet(path, label_column),
        other => {
            return Err(DatasetError::invalid_input(
                path,
                format!("unsupported file extension: .{other}"),
            ))
        }
    }
    .map_err(|e| DatasetError::invalid_input(path, format!("{e:#}")))?;

    table.into_document(path)
}

/// Read and validate a JSON dataset document.
pub fn load_document(path: &Path) -> Result<DatasetDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| DatasetError::invalid_input(path, e))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DatasetError::invalid_input(path, format!("parsing JSON: {e}")))?;
    DatasetDocument::from_json(root)
}

/// Write `doc` as compact JSON.
///
/// The document goes to a sibling temporary file first and is renamed over
/// `path` only once fully written.
pub fn write_document(path: &Path, doc: &DatasetDocument) -> Result<()> {
    let output_err = |source| DatasetError::Output {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let file = File::create(&tmp_path).map_err(output_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, doc).map_err(|e| output_err(e.into()))?;
    writer.flush().map_err(output_err)?;
    drop(writer);

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        output_err(e)
    })
}

// ---------------------------------------------------------------------------
// Tabular intermediate shared by the CSV and Parquet readers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Table {
    column_names: Vec<String>,
    result_map: Vec<String>,
    class_index: HashMap<String, usize>,
    rows: Vec<Row>,
}

impl Table {
    fn new(column_names: Vec<String>) -> Self {
        Table {
            column_names,
            ..Table::default()
        }
    }

    /// Class index for `name`, assigning the next one on first sight.
    fn class_id(&mut self, name: &str) -> usize {
        if let Some(&id) = self.class_index.get(name) {
            return id;
        }
        let id = self.result_map.len();
        self.result_map.push(name.to_string());
        self.class_index.insert(name.to_string(), id);
        id
    }

    fn push(&mut self, class: &str, columns: Vec<f64>) {
        let label = self.class_id(class);
        self.rows.push(Row::new(label, columns));
    }

    fn into_document(self, path: &Path) -> Result<DatasetDocument> {
        let mut doc = DatasetDocument::new(self.column_names, self.result_map, self.rows)?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        doc.table_info.table_name = Some(stem.to_string());
        doc.table_info.query_id = Some(IMPORTED_QUERY_ID);
        Ok(doc)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names.
/// The label column holds class names; every other column must be numeric.
fn load_csv(path: &Path, label_column: &str) -> anyhow::Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let label_idx = headers
        .iter()
        .position(|h| h == label_column)
        .with_context(|| format!("CSV missing '{label_column}' column"))?;

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_idx)
        .map(|(_, h)| h.clone())
        .collect();
    let mut table = Table::new(feature_names);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut columns = Vec::with_capacity(headers.len().saturating_sub(1));
        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == label_idx {
                continue;
            }
            let v = value.trim().parse::<f64>().with_context(|| {
                format!("Row {row_no}, {}: '{value}' is not a number", headers[col_idx])
            })?;
            columns.push(v);
        }

        let class = record.get(label_idx).unwrap_or("");
        table.push(class, columns);
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet table: one label column, every other column numeric.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, label_column: &str) -> anyhow::Result<Table> {
    let file = File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let label_idx = schema
        .index_of(label_column)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{label_column}' column"))?;
    let feature_cols: Vec<(usize, String)> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_idx)
        .map(|(i, f)| (i, f.name().clone()))
        .collect();

    let mut table = Table::new(feature_cols.iter().map(|(_, name)| name.clone()).collect());
    let reader = builder.build().context("building parquet reader")?;

    let mut offset = 0;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let label_col = batch.column(label_idx);

        for row in 0..batch.num_rows() {
            let row_no = offset + row;
            let class = extract_label(label_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{label_column}'"))?;

            let columns = feature_cols
                .iter()
                .map(|(col_idx, name)| {
                    extract_f64(batch.column(*col_idx), row)
                        .with_context(|| format!("Row {row_no}: failed to read '{name}'"))
                })
                .collect::<anyhow::Result<Vec<f64>>>()?;

            table.push(&class, columns);
        }
        offset += batch.num_rows();
    }

    Ok(table)
}

// -- Parquet / Arrow helpers --

/// Read one numeric cell as `f64`.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<f64> {
    if col.is_null(row) {
        bail!("null value in feature column");
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.value(row) as f64)
    } else {
        bail!("column type is {:?}, expected a numeric type", col.data_type())
    }
}

/// Read one label cell as its class name.
fn extract_label(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<String> {
    if col.is_null(row) {
        bail!("null value in label column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row).to_string())
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row).to_string())
        }
        other => bail!("label column type is {other:?}, expected string or integer"),
    }
}
