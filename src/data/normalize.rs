use log::debug;

use super::model::DatasetDocument;
use crate::error::{DatasetError, Result};

/// Largest feature value in the document, never below `0.0`.
pub fn global_max(doc: &DatasetDocument) -> f64 {
    doc.data
        .iter()
        .flat_map(|row| row.columns.iter().copied())
        .fold(0.0, f64::max)
}

/// Divide every feature value by the document's global maximum.
///
/// An empty document comes back unchanged. A non-empty one whose maximum
/// is zero cannot be scaled and is rejected as [`DatasetError::DegenerateInput`].
pub fn normalize(mut doc: DatasetDocument) -> Result<DatasetDocument> {
    doc.validate()?;
    if doc.is_empty() {
        return Ok(doc);
    }

    let max = global_max(&doc);
    if max == 0.0 {
        return Err(DatasetError::DegenerateInput(format!(
            "global maximum over {} rows is zero; nothing to scale by",
            doc.len()
        )));
    }
    debug!("normalizing {} rows by global max {max}", doc.len());

    for row in &mut doc.data {
        for v in &mut row.columns {
            *v /= max;
        }
    }
    Ok(doc)
}
