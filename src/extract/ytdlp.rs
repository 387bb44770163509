//! yt-dlp subprocess adapter
//!
//! Both probing (`-J`) and downloading (`-J --no-simulate`) emit one info
//! JSON document on stdout; downloads land in the caller-provided directory
//! under an `%(id)s.%(ext)s` template.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::process::Command;
use url::Url;

use super::ExtractError;

const TOOL: &str = "yt-dlp";

/// Per-invocation options. Mirrors the small subset of yt-dlp switches the
/// handlers actually use.
#[derive(Debug, Clone, Default)]
pub struct YtdlpOptions {
    /// Format selector, e.g. `best[ext=mp4][filesize<10M]/best[filesize<10M]`.
    pub format: Option<String>,
    /// Hard cap passed as `--max-filesize`.
    pub max_filesize: Option<u64>,
    /// Netscape cookie file for the target site.
    pub cookie_file: Option<PathBuf>,
    /// Raw `--extractor-args` value, e.g. `youtube:player_client=web`.
    pub extractor_args: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub formats: Vec<FormatInfo>,
    #[serde(default)]
    pub requested_downloads: Vec<RequestedDownload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatInfo {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestedDownload {
    pub filepath: PathBuf,
}

impl VideoInfo {
    /// Best direct `.mp4` URL: the top-level pick if its path ends in
    /// `.mp4`, otherwise the first matching format.
    pub fn mp4_url(&self) -> Option<&str> {
        let is_mp4 = |raw: &str| {
            Url::parse(raw).is_ok_and(|u| u.path().ends_with(".mp4"))
        };

        if let Some(top) = self.url.as_deref().filter(|u| is_mp4(u)) {
            return Some(top);
        }
        self.formats
            .iter()
            .filter_map(|f| f.url.as_deref())
            .find(|u| is_mp4(u))
    }

    /// Path of the file yt-dlp actually wrote, when downloading.
    pub fn downloaded_file(&self) -> Option<&Path> {
        self.requested_downloads.first().map(|d| d.filepath.as_path())
    }
}

fn base_command(url: &str, options: &YtdlpOptions) -> Command {
    let mut cmd = Command::new(TOOL);
    cmd.arg("-J")
        .arg("--no-warnings")
        .arg("--no-playlist")
        .arg("--no-progress");
    if let Some(format) = &options.format {
        cmd.arg("-f").arg(format);
    }
    if let Some(max) = options.max_filesize {
        cmd.arg("--max-filesize").arg(max.to_string());
    }
    if let Some(cookies) = &options.cookie_file {
        cmd.arg("--cookies").arg(cookies);
    }
    if let Some(args) = &options.extractor_args {
        cmd.arg("--extractor-args").arg(args);
    }
    cmd.arg(url);
    cmd.kill_on_drop(true);
    cmd
}

async fn run(mut cmd: Command) -> Result<VideoInfo, ExtractError> {
    let output = cmd.output().await?;
    if !output.status.success() {
        return Err(ExtractError::ToolFailed {
            tool: TOOL,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(serde_json::from_slice(&output.stdout)?)
}

/// Fetch video metadata without downloading.
pub async fn probe(url: &str, options: &YtdlpOptions) -> Result<VideoInfo, ExtractError> {
    tracing::debug!(url, "probing with yt-dlp");
    run(base_command(url, options)).await
}

/// Download into `dest_dir` and return the parsed info document.
pub async fn download(
    url: &str,
    options: &YtdlpOptions,
    dest_dir: &Path,
) -> Result<VideoInfo, ExtractError> {
    tracing::debug!(url, dest = %dest_dir.display(), "downloading with yt-dlp");
    let mut cmd = base_command(url, options);
    cmd.arg("--no-simulate")
        .arg("-o")
        .arg(dest_dir.join("%(id)s.%(ext)s"));
    run(cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE_JSON: &str = r#"{
        "id": "abc123",
        "title": "a short clip",
        "url": "https://cdn.example.com/v/abc123.m3u8",
        "width": 720,
        "height": 1280,
        "formats": [
            {"url": "https://cdn.example.com/v/abc123.webm"},
            {"url": "https://cdn.example.com/v/abc123.mp4?token=x"}
        ]
    }"#;

    #[test]
    fn mp4_url_falls_back_to_formats() {
        let info: VideoInfo = serde_json::from_str(PROBE_JSON).unwrap();
        assert_eq!(
            info.mp4_url(),
            Some("https://cdn.example.com/v/abc123.mp4?token=x")
        );
    }

    #[test]
    fn mp4_url_prefers_top_level_pick() {
        let info: VideoInfo = serde_json::from_str(
            r#"{"id": "x", "url": "https://cdn.example.com/v/x.mp4"}"#,
        )
        .unwrap();
        assert_eq!(info.mp4_url(), Some("https://cdn.example.com/v/x.mp4"));
    }

    #[test]
    fn downloaded_file_comes_from_requested_downloads() {
        let info: VideoInfo = serde_json::from_str(
            r#"{"id": "x", "requested_downloads": [{"filepath": "/tmp/scratch/x.mp4"}]}"#,
        )
        .unwrap();
        assert_eq!(
            info.downloaded_file(),
            Some(Path::new("/tmp/scratch/x.mp4"))
        );

        let empty: VideoInfo = serde_json::from_str(r#"{"id": "y"}"#).unwrap();
        assert_eq!(empty.downloaded_file(), None);
    }
}
