use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// Row – one record of the table
// ---------------------------------------------------------------------------

/// A single record: feature values plus the index of its class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Index into [`DatasetDocument::result_map`].
    #[serde(alias = "class")]
    pub label: usize,
    /// Feature values, aligned with [`TableInfo::column_names`].
    pub columns: Vec<f64>,
    /// Any other keys the producer wrote; carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Row {
    pub fn new(label: usize, columns: Vec<f64>) -> Self {
        Row {
            label,
            columns,
            extra: Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// TableInfo – column metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<u64>,
    /// Attribute names; position is the column index.
    pub column_names: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

// ---------------------------------------------------------------------------
// DatasetDocument – the complete on-disk record
// ---------------------------------------------------------------------------

/// The full dataset as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDocument {
    pub table_info: TableInfo,
    /// Class labels; position is the class index rows refer to.
    pub result_map: Vec<String>,
    pub data: Vec<Row>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl DatasetDocument {
    /// Build a document from parts, checking the shape invariants.
    pub fn new(column_names: Vec<String>, result_map: Vec<String>, data: Vec<Row>) -> Result<Self> {
        let doc = DatasetDocument {
            table_info: TableInfo {
                column_names,
                ..TableInfo::default()
            },
            result_map,
            data,
            extra: Map::new(),
        };
        doc.validate()?;
        Ok(doc)
    }

    /// Interpret an already-parsed JSON value as a dataset and validate it.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        let doc: DatasetDocument = serde_json::from_value(value)
            .map_err(|e| DatasetError::SchemaViolation(e.to_string()))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Check that every row is aligned with `column_names`, points at a
    /// real class, and holds only finite values.
    pub fn validate(&self) -> Result<()> {
        let n_cols = self.num_columns();
        let n_classes = self.result_map.len();
        for (i, row) in self.data.iter().enumerate() {
            if row.columns.len() != n_cols {
                return Err(DatasetError::SchemaViolation(format!(
                    "row {i} has {} values but there are {n_cols} column names",
                    row.columns.len()
                )));
            }
            if row.label >= n_classes {
                return Err(DatasetError::SchemaViolation(format!(
                    "row {i} refers to class {} but result_map has {n_classes} entries",
                    row.label
                )));
            }
            // non-finite values cannot be written back as JSON numbers
            if let Some(j) = row.columns.iter().position(|v| !v.is_finite()) {
                return Err(DatasetError::SchemaViolation(format!(
                    "row {i}, column {j} holds non-finite value {}",
                    row.columns[j]
                )));
            }
        }
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn num_columns(&self) -> usize {
        self.table_info.column_names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.table_info.column_names
    }

    /// Label string of a row's class.
    pub fn class_of(&self, row: &Row) -> Option<&str> {
        self.result_map.get(row.label).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// DatasetSummary – what `inspect` prints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    /// Rows per class, in `result_map` order.
    pub class_counts: Vec<(String, usize)>,
    /// Smallest and largest feature value; `None` when there are no values.
    pub value_range: Option<(f64, f64)>,
}

impl DatasetSummary {
    pub fn of(doc: &DatasetDocument) -> Self {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for row in &doc.data {
            *counts.entry(row.label).or_default() += 1;
        }
        let class_counts = doc
            .result_map
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), counts.get(&i).copied().unwrap_or(0)))
            .collect();

        let value_range = doc
            .data
            .iter()
            .flat_map(|row| row.columns.iter().copied())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });

        DatasetSummary {
            rows: doc.len(),
            columns: doc.num_columns(),
            class_counts,
            value_range,
        }
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows:    {}", self.rows)?;
        writeln!(f, "columns: {}", self.columns)?;
        writeln!(f, "classes: {}", self.class_counts.len())?;
        for (name, count) in &self.class_counts {
            writeln!(f, "  {name}: {count}")?;
        }
        match self.value_range {
            Some((lo, hi)) => write!(f, "values:  [{lo}, {hi}]"),
            None => write!(f, "values:  <none>"),
        }
    }
}
