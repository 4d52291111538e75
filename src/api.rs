// API client module: a small blocking HTTP client that talks to the
// detection backend. Two endpoints are consumed: `POST /detect` takes a
// multipart file upload and answers with a task id, `GET /status/{id}`
// reports how far that task has come.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

/// Fixed form fields the backend expects alongside the uploaded file.
const MODEL_SIZE: &str = "small";
const TRANSLATE: &str = "false";
const VAD: &str = "false";

/// Blocking API client holding a reqwest client and the base URL of the
/// detection backend. The base URL lives here and nowhere else.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Response to a submission. The backend answers `status = "pending"`
/// plus a `task_id` when it accepted the file; anything else means the
/// file was not queued. Unknown fields are kept for debug logging.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One status report for a submitted task. Besides `status` the payload
/// carries arbitrary result data (transcripts, timings), which is passed
/// through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TaskStatus {
    /// Whether the backend is still working on the task. Every status
    /// outside this set is terminal, including backend-reported failures.
    pub fn is_in_progress(&self) -> bool {
        matches!(self.status.as_str(), "pending" | "processing")
    }
}

/// Failure classes for one API call. All of them are recoverable from the
/// caller's point of view: a failed submission skips the file, a failed
/// status check is retried by the poller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to open {path}: {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unexpected HTTP status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("submission not accepted, server reported status {status:?}")]
    NotAccepted { status: String },
    #[error("submission pending but response carried no task_id")]
    MissingTaskId,
}

impl ApiClient {
    /// Create a client for the given base URL. `timeout` bounds every
    /// request round trip, upload and status check alike.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload one file for detection and return the task id the backend
    /// assigned to it. Any error means the file will not be polled.
    pub fn submit(&self, path: &Path) -> Result<String, ApiError> {
        info!("Submitting file: {}", path.display());
        let result = self.submit_inner(path);
        if let Err(err) = &result {
            error!("Submission failed for {}: {err}", path.display());
        }
        result
    }

    fn submit_inner(&self, path: &Path) -> Result<String, ApiError> {
        let url = format!("{}/detect", self.base_url);

        let file = File::open(path).map_err(|source| ApiError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin");
        let part = multipart::Part::reader(file)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("model_size", MODEL_SIZE)
            .text("translate", TRANSLATE)
            .text("vad", VAD);

        let res = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_else(|_| "".into());
            return Err(ApiError::Status { status, body });
        }

        let parsed: SubmitResponse = res.json()?;
        debug!("Response received: {parsed:?}");
        if parsed.status != "pending" {
            return Err(ApiError::NotAccepted {
                status: parsed.status,
            });
        }
        parsed.task_id.ok_or(ApiError::MissingTaskId)
    }

    /// Fetch the current status of a task. The payload is returned as-is;
    /// deciding whether it is terminal is the poller's business.
    pub fn task_status(&self, task_id: &str) -> Result<TaskStatus, ApiError> {
        let url = format!("{}/status/{}", self.base_url, task_id);
        info!("Checking status for task ID: {task_id}");

        let res = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_else(|_| "".into());
            return Err(ApiError::Status { status, body });
        }
        Ok(res.json()?)
    }
}
