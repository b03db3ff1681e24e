use std::path::Path;

use log::info;

use crate::config::TransformConfig;
use crate::data::filter::split;
use crate::data::loader::{load_document, load_file, write_document};
use crate::data::model::{DatasetDocument, DatasetSummary};
use crate::data::normalize::{global_max, normalize};
use crate::data::shuffle::{shuffle, ShuffleAlgorithm};
use crate::error::Result;

// ---------------------------------------------------------------------------
// File-level jobs: read one document, transform, write one document
// ---------------------------------------------------------------------------

/// Shuffle settings that are not part of [`TransformConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShuffleOptions {
    pub algorithm: ShuffleAlgorithm,
    pub seed: Option<u64>,
}

fn finish(config: &TransformConfig, job: &str, input: (usize, usize), out: &DatasetDocument) -> Result<DatasetSummary> {
    write_document(&config.output_path, out)?;
    info!(
        "{job}: {} rows x {} columns -> {} rows x {} columns, wrote {}",
        input.0,
        input.1,
        out.len(),
        out.num_columns(),
        config.output_path.display()
    );
    Ok(DatasetSummary::of(out))
}

pub fn normalize_file(config: &TransformConfig) -> Result<DatasetSummary> {
    let doc = load_document(&config.input_path)?;
    let shape = (doc.len(), doc.num_columns());
    info!("normalize: global max of {} is {}", config.input_path.display(), global_max(&doc));
    let out = normalize(doc)?;
    finish(config, "normalize", shape, &out)
}

pub fn split_file(config: &TransformConfig) -> Result<DatasetSummary> {
    let doc = load_document(&config.input_path)?;
    let shape = (doc.len(), doc.num_columns());
    let out = split(doc, &config.selection())?;
    finish(config, "split", shape, &out)
}

pub fn shuffle_file(config: &TransformConfig, options: ShuffleOptions) -> Result<DatasetSummary> {
    let doc = load_document(&config.input_path)?;
    let shape = (doc.len(), doc.num_columns());
    let out = shuffle(doc, options.algorithm, options.seed);
    finish(config, "shuffle", shape, &out)
}

/// Convert a CSV/Parquet table (or re-validate a JSON document) into a
/// dataset document.
pub fn import_file(config: &TransformConfig, label_column: &str) -> Result<DatasetSummary> {
    let doc = load_file(&config.input_path, label_column)?;
    let shape = (doc.len(), doc.num_columns());
    finish(config, "import", shape, &doc)
}

pub fn inspect_file(path: &Path) -> Result<DatasetSummary> {
    let doc = load_document(path)?;
    Ok(DatasetSummary::of(&doc))
}
