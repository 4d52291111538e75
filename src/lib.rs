// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to run one batch submission pass.
//
// Module responsibilities:
// - `cli`: Command-line argument definitions.
// - `api`: Encapsulates HTTP interactions with the detection backend
//   (multipart submission, status checks).
// - `files`: Recursive enumeration of the files to submit.
// - `poller`: Blocks on one submitted task until the backend reports a
//   terminal status.
// - `runner`: Drives files through submit-then-poll and collects the
//   per-file outcomes.
// - `logging`: Console plus rotating-file tracing setup.
pub mod api;
pub mod cli;
pub mod files;
pub mod logging;
pub mod poller;
pub mod runner;
