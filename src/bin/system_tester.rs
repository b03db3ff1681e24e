//! Runs the classifier executable once per test file and reports how long
//! each run took.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tinman_data::runner::{display_name, run_suite, RunEvent};
use tinman_data::RunnerConfig;

#[derive(Parser, Debug)]
#[command(name = "system_tester", about = "Time an executable over a list of test files")]
struct Args {
    /// JSON file with `executable`, `directory` and `tests`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Executable to invoke (overrides the config file)
    #[arg(long)]
    executable: Option<PathBuf>,

    /// Directory holding the test files (overrides the config file)
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Test file names (override the config file)
    tests: Vec<String>,
}

impl Args {
    fn into_config(self) -> Result<RunnerConfig> {
        let mut config = match &self.config {
            Some(path) => RunnerConfig::load(path)?,
            None => RunnerConfig::default(),
        };
        if let Some(executable) = self.executable {
            config.executable = executable;
        }
        if let Some(directory) = self.directory {
            config.directory = directory;
        }
        if !self.tests.is_empty() {
            config.tests = self.tests;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let config = Args::parse().into_config()?;

    run_suite(&config, |event| match event {
        RunEvent::Started(name) => println!("\ntest batch: \"{}\"", display_name(name)),
        RunEvent::Finished(timing) => println!(
            "test \"{}\" took {}\n",
            display_name(&timing.name),
            timing.elapsed.as_secs_f64()
        ),
    })
    .with_context(|| format!("running tests with {}", config.executable.display()))?;
    Ok(())
}
