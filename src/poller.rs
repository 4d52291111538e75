// Status polling loop. Once a file has been accepted by the backend the
// run blocks here until the task reaches a terminal status or the check
// failure budget runs out.

use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, TaskStatus};

/// Pacing and patience for one polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Pause between consecutive status checks.
    pub interval: Duration,
    /// Consecutive failed checks after which the task is abandoned. An
    /// in-progress report resets the count; only back-to-back failures
    /// accumulate.
    pub max_check_failures: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: Duration::from_secs(10),
            max_check_failures: 30,
        }
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("gave up on task {task_id} after {failures} failed status checks")]
    Abandoned { task_id: String, failures: u32 },
}

/// Block until the backend reports a terminal status for `task_id` and
/// return that last payload. "pending" and "processing" keep the loop
/// going; any other status ends it, whether it spells success or not.
///
/// The first check fires immediately; after that the loop sleeps
/// `config.interval` between checks. Failed checks (transport errors,
/// non-2xx responses) are logged and retried on the same cadence until
/// `config.max_check_failures` of them pile up in a row.
pub fn poll_until_terminal(
    api: &ApiClient,
    task_id: &str,
    config: &PollConfig,
) -> Result<TaskStatus, PollError> {
    let mut failures = 0u32;
    loop {
        match api.task_status(task_id) {
            Ok(status) if status.is_in_progress() => {
                failures = 0;
                info!("Task {task_id} is still {}.", status.status);
            }
            Ok(status) => {
                info!("Task {task_id} completed with status: {}", status.status);
                if let Ok(pretty) = serde_json::to_string_pretty(&status) {
                    debug!("Result: {pretty}");
                }
                return Ok(status);
            }
            Err(err) => {
                failures += 1;
                warn!(
                    "Status check failed for task {task_id} ({failures}/{}): {err}",
                    config.max_check_failures
                );
                if failures >= config.max_check_failures {
                    return Err(PollError::Abandoned {
                        task_id: task_id.to_string(),
                        failures,
                    });
                }
            }
        }
        thread::sleep(config.interval);
    }
}
