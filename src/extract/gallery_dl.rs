//! gallery-dl subprocess adapter
//!
//! `gallery-dl --dump-json` prints an array of tagged entries: `[2, meta]`
//! carries post-level metadata, `[3, url, meta]` one downloadable file.

use std::path::Path;

use serde_json::Value;
use tokio::process::Command;

use super::ExtractError;

const TOOL: &str = "gallery-dl";

const TAG_POST_META: u64 = 2;
const TAG_FILE: u64 = 3;

/// One downloadable file from a dump.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub url: String,
    pub meta: Value,
}

impl GalleryEntry {
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(Value::as_str)
    }

    pub fn meta_u32(&self, key: &str) -> Option<u32> {
        self.meta.get(key).and_then(Value::as_u64).map(|v| v as u32)
    }

    /// MIME hint carried in the entry metadata, when present and valid.
    pub fn mime_hint(&self) -> Option<mime::Mime> {
        self.meta_str("mime_type").and_then(|s| s.parse().ok())
    }
}

/// Parsed `--dump-json` output.
#[derive(Debug, Clone)]
pub struct GalleryDump {
    /// Post-level metadata (title, author, ...), `Value::Null` if absent.
    pub meta: Value,
    pub entries: Vec<GalleryEntry>,
}

impl GalleryDump {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Post-level string field, e.g. `title` or `content`.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(Value::as_str)
    }
}

/// Run gallery-dl against `url` and parse its dump output.
pub async fn dump(url: &str, cookie_file: Option<&Path>) -> Result<GalleryDump, ExtractError> {
    tracing::debug!(url, "dumping with gallery-dl");
    let mut cmd = Command::new(TOOL);
    cmd.arg("--dump-json");
    if let Some(cookies) = cookie_file {
        cmd.arg("--cookies").arg(cookies);
    }
    cmd.arg(url);
    cmd.kill_on_drop(true);

    let output = cmd.output().await?;
    if !output.status.success() {
        return Err(ExtractError::ToolFailed {
            tool: TOOL,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    parse_dump(&output.stdout)
}

fn parse_dump(raw: &[u8]) -> Result<GalleryDump, ExtractError> {
    let rows: Vec<Value> = serde_json::from_slice(raw)?;

    let mut meta = Value::Null;
    let mut entries = Vec::new();

    for row in rows {
        let Some(items) = row.as_array() else {
            continue;
        };
        match (items.first().and_then(Value::as_u64), items.len()) {
            (Some(TAG_POST_META), 2) => {
                if meta.is_null() {
                    meta = items[1].clone();
                }
            }
            (Some(TAG_FILE), 3) => {
                if let Some(url) = items[1].as_str() {
                    entries.push(GalleryEntry {
                        url: url.to_string(),
                        meta: items[2].clone(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(GalleryDump { meta, entries })
}
