pub mod config;
pub mod data;
pub mod error;
pub mod jobs;
pub mod runner;

pub use config::{RunnerConfig, TransformConfig};
pub use data::filter::{split, Selection};
pub use data::model::{DatasetDocument, DatasetSummary, Row, TableInfo};
pub use data::normalize::normalize;
pub use data::shuffle::{shuffle, ShuffleAlgorithm};
pub use error::{DatasetError, Result, SelectionKind};
