// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, create an API
//   client and hand everything to the runner.
// - Returns `anyhow::Result` so enumeration errors, fail-fast aborts and
//   setup failures exit non-zero.

use std::time::Duration;

use clap::Parser;
use tracing::info;

use detect_batch_cli::api::ApiClient;
use detect_batch_cli::cli::Cli;
use detect_batch_cli::logging;
use detect_batch_cli::poller::PollConfig;
use detect_batch_cli::runner::{self, RunOptions};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_dir)?;

    let api = ApiClient::new(&cli.base_url, Duration::from_secs(cli.request_timeout))?;
    let poll = PollConfig {
        interval: Duration::from_secs(cli.poll_interval),
        max_check_failures: cli.poll_retries,
    };
    let options = RunOptions {
        directory: cli.directory,
        max_tasks: cli.max_tasks,
        fail_fast: cli.fail_fast,
    };

    info!("Starting file processing...");
    runner::run(&api, &poll, &options)?;
    Ok(())
}
