use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use tinman_data::config::{
    TransformConfig, DEFAULT_NORMALIZE_INPUT, DEFAULT_NORMALIZE_OUTPUT, DEFAULT_SHUFFLE_FILE,
    DEFAULT_SPLIT_ATTRIBUTES, DEFAULT_SPLIT_CLASSES, DEFAULT_SPLIT_INPUT, DEFAULT_SPLIT_OUTPUT,
};
use tinman_data::data::loader::DEFAULT_LABEL_COLUMN;
use tinman_data::jobs::{self, ShuffleOptions};
use tinman_data::ShuffleAlgorithm;

#[derive(Parser, Debug)]
#[command(
    name = "tinman-data",
    about = "Normalize, split, shuffle and import JSON tabular datasets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Divide every feature value by the dataset's global maximum
    Normalize {
        #[arg(long, default_value = DEFAULT_NORMALIZE_INPUT)]
        input: PathBuf,
        #[arg(long, default_value = DEFAULT_NORMALIZE_OUTPUT)]
        output: PathBuf,
    },
    /// Keep only the selected classes and attributes
    Split(SplitArgs),
    /// Randomly reorder rows
    Shuffle {
        #[arg(long, default_value = DEFAULT_SHUFFLE_FILE)]
        input: PathBuf,
        /// Destination file (defaults to rewriting the input)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Seed for a reproducible order
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = ShuffleAlgorithm::FisherYates)]
        algorithm: ShuffleAlgorithm,
    },
    /// Build a dataset document from a CSV or Parquet table
    Import {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Column holding the class names
        #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
        label_column: String,
    },
    /// Print row, column and class counts of a dataset document
    Inspect {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SplitArgs {
    #[arg(long, default_value = DEFAULT_SPLIT_INPUT)]
    input: PathBuf,
    #[arg(long, default_value = DEFAULT_SPLIT_OUTPUT)]
    output: PathBuf,
    /// Class label to keep (repeatable)
    #[arg(long = "class", value_name = "LABEL", default_values_t = DEFAULT_SPLIT_CLASSES.map(String::from))]
    classes: Vec<String>,
    /// Attribute name to keep (repeatable)
    #[arg(long = "attribute", value_name = "NAME", default_values_t = DEFAULT_SPLIT_ATTRIBUTES.map(String::from))]
    attributes: Vec<String>,
    /// Keep every class, ignoring --class
    #[arg(long)]
    all_classes: bool,
    /// Keep every attribute, ignoring --attribute
    #[arg(long)]
    all_attributes: bool,
}

impl SplitArgs {
    fn into_config(self) -> TransformConfig {
        TransformConfig {
            input_path: self.input,
            output_path: self.output,
            desired_classes: (!self.all_classes).then_some(self.classes),
            desired_attributes: (!self.all_attributes).then_some(self.attributes),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let summary = match cli.command {
        Command::Normalize { input, output } => {
            let config = TransformConfig::new(input, output);
            jobs::normalize_file(&config)
                .with_context(|| format!("normalizing {}", config.input_path.display()))?
        }
        Command::Split(args) => {
            let config = args.into_config();
            jobs::split_file(&config)
                .with_context(|| format!("splitting {}", config.input_path.display()))?
        }
        Command::Shuffle {
            input,
            output,
            seed,
            algorithm,
        } => {
            let output = output.unwrap_or_else(|| input.clone());
            let config = TransformConfig::new(input, output);
            jobs::shuffle_file(&config, ShuffleOptions { algorithm, seed })
                .with_context(|| format!("shuffling {}", config.input_path.display()))?
        }
        Command::Import {
            input,
            output,
            label_column,
        } => {
            let config = TransformConfig::new(input, output);
            jobs::import_file(&config, &label_column)
                .with_context(|| format!("importing {}", config.input_path.display()))?
        }
        Command::Inspect { input } => {
            jobs::inspect_file(&input).with_context(|| format!("inspecting {}", input.display()))?
        }
    };

    println!("{summary}");
    Ok(())
}
