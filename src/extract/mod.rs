//! Adapters around external extraction tooling
//!
//! Per-site extraction is delegated to yt-dlp and gallery-dl subprocesses;
//! this module owns the subprocess plumbing and output parsing so handlers
//! stay thin.

pub mod gallery_dl;
pub mod ytdlp;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to spawn extractor: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("failed to parse extractor output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("http probe failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Content length of a remote resource via a HEAD request.
///
/// Servers that omit Content-Length yield `None`; callers decide whether to
/// accept media of unknown size.
pub async fn content_length(
    client: &reqwest::Client,
    url: &str,
) -> Result<Option<u64>, ExtractError> {
    let response = client.head(url).send().await?.error_for_status()?;
    Ok(response.content_length())
}
