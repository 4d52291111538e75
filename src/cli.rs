// Command-line interface definitions. The parsed `Cli` value is the whole
// run configuration; nothing else is read at startup besides the
// environment fallbacks declared here.

use std::path::PathBuf;

use clap::Parser;

/// Submit every file under a directory to the detection backend and wait
/// for each task to finish before moving on.
#[derive(Debug, Parser)]
#[command(name = "detect-batch-cli", version, about)]
pub struct Cli {
    /// Directory containing files to process
    #[arg(short, long, default_value = "./test")]
    pub directory: PathBuf,

    /// Maximum number of tasks to process
    #[arg(short, long, default_value_t = 1)]
    pub max_tasks: usize,

    /// Base URL of the detection backend
    #[arg(long, env = "DETECT_BASE_URL", default_value = "http://192.168.5.247:3001")]
    pub base_url: String,

    /// Seconds to wait between status checks for a submitted task
    #[arg(long, default_value_t = 10)]
    pub poll_interval: u64,

    /// Per-request timeout in seconds for both submission and status calls
    #[arg(long, default_value_t = 30)]
    pub request_timeout: u64,

    /// Consecutive failed status checks after which a task is abandoned
    #[arg(long, default_value_t = 30)]
    pub poll_retries: u32,

    /// Abort the whole run when a task is abandoned instead of moving on
    /// to the next file
    #[arg(long)]
    pub fail_fast: bool,

    /// Directory that receives the rotating log files
    #[arg(long, default_value = "./logs")]
    pub log_dir: PathBuf,
}
