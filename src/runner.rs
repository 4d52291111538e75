// Orchestration loop: walk the directory, submit each file, wait for the
// task to finish, move on. Files are strictly sequential; the next
// submission never starts before the previous task's polling loop exits.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::files;
use crate::poller::{self, PollConfig};

/// Caller-supplied knobs for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root of the tree to enumerate.
    pub directory: PathBuf,
    /// Stop after this many files have been handled, whatever their outcome.
    pub max_tasks: usize,
    /// Abort the whole run the first time a task is abandoned.
    pub fail_fast: bool,
}

/// What happened to one enumerated file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Submitted and polled to a terminal status.
    Completed { path: PathBuf, status: String },
    /// Submission was rejected or failed; the file was never polled.
    Skipped { path: PathBuf },
    /// Submitted, but the polling loop gave up on the task.
    Failed { path: PathBuf, reason: String },
}

/// Tally of outcomes across the run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Completed { .. } => self.completed += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.completed + self.skipped + self.failed
    }
}

/// Process up to `options.max_tasks` files from `options.directory`.
/// Enumeration errors abort the run; per-file failures are tallied and
/// the run moves on, unless `fail_fast` is set and a task was abandoned.
pub fn run(api: &ApiClient, poll: &PollConfig, options: &RunOptions) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (index, entry) in files::walk_files(&options.directory).enumerate() {
        let count = index + 1;
        let path = entry.with_context(|| {
            format!("Failed to enumerate {}", options.directory.display())
        })?;

        let outcome = process_file(api, poll, &path);
        summary.record(&outcome);
        match &outcome {
            FileOutcome::Completed { .. } => {}
            FileOutcome::Skipped { path } => {
                warn!("Task submission failed for file: {}", path.display());
            }
            FileOutcome::Failed { path, reason } => {
                warn!("Giving up on file {}: {reason}", path.display());
                if options.fail_fast {
                    bail!("stopping run after abandoned task for {}", path.display());
                }
            }
        }

        if count >= options.max_tasks {
            break;
        }
    }

    info!(
        "Run finished: {} file(s) processed, {} completed, {} skipped, {} failed",
        summary.total(),
        summary.completed,
        summary.skipped,
        summary.failed
    );
    Ok(summary)
}

fn process_file(api: &ApiClient, poll: &PollConfig, path: &Path) -> FileOutcome {
    let task_id = match api.submit(path) {
        Ok(task_id) => task_id,
        Err(_) => {
            return FileOutcome::Skipped {
                path: path.to_path_buf(),
            }
        }
    };

    match poller::poll_until_terminal(api, &task_id, poll) {
        Ok(status) => FileOutcome::Completed {
            path: path.to_path_buf(),
            status: status.status,
        },
        Err(err) => FileOutcome::Failed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    }
}
