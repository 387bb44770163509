use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handlers::RegisteredHandler;
use crate::media::MediaItem;
use crate::observability::MetricsSnapshot;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolveRequest {
    pub url: String,
}

/// Broad content class, so callers can pick a delivery path without
/// re-parsing the MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl From<&MediaItem> for MediaKind {
    fn from(item: &MediaItem) -> Self {
        if item.is_image() {
            MediaKind::Image
        } else if item.is_video() {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

/// One resolved media item as delivered to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaPayload {
    pub id: Uuid,
    /// Externally-referenceable handle: the remote URL or the published
    /// location of a materialized artifact.
    pub url: String,
    pub kind: MediaKind,
    pub mime_type: String,
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl From<&MediaItem> for MediaPayload {
    fn from(item: &MediaItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: item
                .handle()
                .map(str::to_string)
                .unwrap_or_else(|| item.source().describe()),
            kind: MediaKind::from(item),
            mime_type: item.mime_type().to_string(),
            caption: item.caption().to_string(),
            original_url: item.original_url().map(str::to_string),
            width: item.width(),
            height: item.height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub url: String,
    pub media: Vec<MediaPayload>,
    pub resolved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

/// Registry introspection entry; disabled handlers are included.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerInfo {
    pub name: String,
    pub weight: i32,
    pub enabled: bool,
    pub patterns: Vec<String>,
}

impl From<&RegisteredHandler> for HandlerInfo {
    fn from(entry: &RegisteredHandler) -> Self {
        Self {
            name: entry.name().to_string(),
            weight: entry.weight(),
            enabled: entry.is_enabled(),
            patterns: entry.pattern_strings().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub handlers: usize,
    pub metrics: MetricsSnapshot,
}
