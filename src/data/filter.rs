use std::collections::BTreeSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::model::DatasetDocument;
use crate::error::{DatasetError, Result, SelectionKind};

// ---------------------------------------------------------------------------
// Selection: which classes and attributes to keep
// ---------------------------------------------------------------------------

/// Desired class labels and attribute names.
/// A `None` list keeps every value of that category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub classes: Option<Vec<String>>,
    pub attributes: Option<Vec<String>>,
}

impl Selection {
    /// Keep everything.
    pub fn all() -> Self {
        Selection::default()
    }

    pub fn new<C, A>(classes: C, attributes: A) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Selection {
            classes: Some(classes.into_iter().map(Into::into).collect()),
            attributes: Some(attributes.into_iter().map(Into::into).collect()),
        }
    }
}

// ---------------------------------------------------------------------------
// SelectionPlan: the selection resolved to indices
// ---------------------------------------------------------------------------

/// Source indices partitioned by a [`Selection`], each list in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    /// `result_map` indices to keep.
    pub classes: Vec<usize>,
    /// `result_map` indices whose rows are dropped.
    pub outliers: Vec<usize>,
    /// `column_names` indices to keep.
    pub columns: Vec<usize>,
}

impl SelectionPlan {
    /// For each source class index, its index in the filtered `result_map`.
    fn class_remap(&self, n_classes: usize) -> Vec<Option<usize>> {
        let mut remap = vec![None; n_classes];
        for (new_idx, &old_idx) in self.classes.iter().enumerate() {
            remap[old_idx] = Some(new_idx);
        }
        remap
    }
}

/// Resolve names to indices. Every requested name must exist.
pub fn plan_selection(doc: &DatasetDocument, selection: &Selection) -> Result<SelectionPlan> {
    let (classes, outliers) = partition(&doc.result_map, selection.classes.as_deref(), SelectionKind::Class)?;
    let (columns, _) = partition(
        doc.column_names(),
        selection.attributes.as_deref(),
        SelectionKind::Attribute,
    )?;
    Ok(SelectionPlan {
        classes,
        outliers,
        columns,
    })
}

fn partition(
    names: &[String],
    wanted: Option<&[String]>,
    kind: SelectionKind,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let Some(wanted) = wanted else {
        return Ok(((0..names.len()).collect(), Vec::new()));
    };

    let wanted: BTreeSet<&str> = wanted.iter().map(String::as_str).collect();
    let present: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    if let Some(missing) = wanted.difference(&present).next() {
        return Err(DatasetError::SelectionNotFound {
            kind,
            name: missing.to_string(),
        });
    }

    let (kept, rest): (Vec<usize>, Vec<usize>) =
        (0..names.len()).partition(|&i| wanted.contains(names[i].as_str()));
    Ok((kept, rest))
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Project `doc` onto `selection`.
///
/// Rows of unselected classes are dropped. Kept rows have their class index
/// remapped into the filtered `result_map` and their values restricted to the
/// selected columns.
pub fn split(doc: DatasetDocument, selection: &Selection) -> Result<DatasetDocument> {
    doc.validate()?;
    let plan = plan_selection(&doc, selection)?;
    debug!(
        "selection plan: classes {:?}, outliers {:?}, columns {:?}",
        plan.classes, plan.outliers, plan.columns
    );

    let remap = plan.class_remap(doc.result_map.len());
    let DatasetDocument {
        mut table_info,
        result_map,
        data,
        extra,
    } = doc;

    let rows_in = data.len();
    let data: Vec<_> = data
        .into_iter()
        .filter_map(|mut row| {
            let label = remap[row.label]?;
            row.label = label;
            row.columns = plan.columns.iter().map(|&c| row.columns[c]).collect();
            Some(row)
        })
        .collect();
    if data.is_empty() && rows_in > 0 {
        warn!("selection dropped all {rows_in} rows");
    }

    table_info.column_names = plan
        .columns
        .iter()
        .map(|&c| table_info.column_names[c].clone())
        .collect();
    let result_map = plan.classes.iter().map(|&c| result_map[c].clone()).collect();

    Ok(DatasetDocument {
        table_info,
        result_map,
        data,
        extra,
    })
}
