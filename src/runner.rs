//! Timed, sequential execution of an external test executable.
//!
//! The runner only measures. Exit codes are recorded but never judged, and
//! a hung child blocks the run indefinitely.

use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::RunnerConfig;
use crate::error::{DatasetError, Result};

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTiming {
    pub name: String,
    pub elapsed: Duration,
    /// `None` when the child was killed by a signal.
    pub exit_code: Option<i32>,
}

/// The name shown in reports: the file name without its `.json` suffix.
pub fn display_name(name: &str) -> &str {
    name.strip_suffix(".json").unwrap_or(name)
}

/// Run the executable once on `directory/name`, inheriting stdio.
pub fn run_test(config: &RunnerConfig, name: &str) -> Result<TestTiming> {
    let target = config.test_path(name);
    debug!("launching {} {}", config.executable.display(), target.display());
    let start = Instant::now();
    let status = launch(&config.executable, &target)?;
    let elapsed = start.elapsed();
    info!(
        "{} finished in {:.3}s (exit {:?})",
        display_name(name),
        elapsed.as_secs_f64(),
        status
    );
    Ok(TestTiming {
        name: name.to_string(),
        elapsed,
        exit_code: status,
    })
}

fn launch(executable: &Path, target: &Path) -> Result<Option<i32>> {
    let status = Command::new(executable)
        .arg(target)
        .status()
        .map_err(|source| DatasetError::Launch {
            executable: executable.to_path_buf(),
            source,
        })?;
    Ok(status.code())
}

/// Progress reported by [`run_suite`] around each invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent<'a> {
    Started(&'a str),
    Finished(&'a TestTiming),
}

/// Run every configured test in order, reporting each start and finish to
/// `on_event`. Stops at the first launch failure.
pub fn run_suite<F>(config: &RunnerConfig, mut on_event: F) -> Result<Vec<TestTiming>>
where
    F: FnMut(RunEvent<'_>),
{
    let mut timings = Vec::with_capacity(config.tests.len());
    for name in &config.tests {
        on_event(RunEvent::Started(name));
        let timing = run_test(config, name)?;
        on_event(RunEvent::Finished(&timing));
        timings.push(timing);
    }
    Ok(timings)
}
