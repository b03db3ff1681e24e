//! Configuration for the data jobs and the test runner.
//!
//! The defaults reproduce the paths and selections the tools were
//! originally run with.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::filter::Selection;
use crate::error::{DatasetError, Result};

/// Input/output and selection for a single data job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Only read by `split`; `None` keeps every class.
    #[serde(default)]
    pub desired_classes: Option<Vec<String>>,
    /// Only read by `split`; `None` keeps every attribute.
    #[serde(default)]
    pub desired_attributes: Option<Vec<String>>,
}

impl TransformConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        TransformConfig {
            input_path: input_path.into(),
            output_path: output_path.into(),
            desired_classes: None,
            desired_attributes: None,
        }
    }

    pub fn selection(&self) -> Selection {
        Selection {
            classes: self.desired_classes.clone(),
            attributes: self.desired_attributes.clone(),
        }
    }
}

pub const DEFAULT_NORMALIZE_INPUT: &str = "original_datasets/mnist_train.json";
pub const DEFAULT_NORMALIZE_OUTPUT: &str = "normalized_mnist_train.json";
pub const DEFAULT_SPLIT_INPUT: &str = "normalized_iris.json";
pub const DEFAULT_SPLIT_OUTPUT: &str = "setosa_versicolor_iris.json";
pub const DEFAULT_SPLIT_CLASSES: [&str; 2] = ["Iris_setosa", "Iris_versicolor"];
pub const DEFAULT_SPLIT_ATTRIBUTES: [&str; 2] = ["sepal_length", "petal_length"];
pub const DEFAULT_SHUFFLE_FILE: &str = "normalized_mnist_train.json";

/// External executable, the directory holding its test files, and which
/// files to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub executable: PathBuf,
    pub directory: PathBuf,
    pub tests: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("target/debug/tinman"),
            directory: PathBuf::from("testing_files"),
            tests: vec!["classifier_tests.json".to_string()],
        }
    }
}

impl RunnerConfig {
    /// Read a JSON config file. Absent fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DatasetError::invalid_input(path, e))?;
        serde_json::from_str(&text).map_err(|e| DatasetError::invalid_input(path, format!("parsing runner config: {e}")))
    }

    /// Full path handed to the executable for one test file.
    pub fn test_path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}
