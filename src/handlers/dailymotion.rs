//! Dailymotion videos, via yt-dlp

use async_trait::async_trait;

use super::traits::{Handled, HandlerError, UrlHandler};
use crate::dispatch::RequestContext;
use crate::extract::ytdlp::{self, YtdlpOptions};
use crate::media::{MediaItem, MediaSource};

// dailymotion serves long-form video, so the cap is looser than the
// default request limit
const MAX_VIDEO_BYTES: u64 = 40 << 20;

pub struct DailymotionHandler;

#[async_trait]
impl UrlHandler for DailymotionHandler {
    fn name(&self) -> &'static str {
        "dailymotion"
    }

    fn url_patterns(&self) -> &'static [&'static str] {
        &[r"^https://(www\.)?dailymotion\.com/video/[\w-]+/?"]
    }

    fn weight(&self) -> i32 {
        1000
    }

    async fn handle(
        &self,
        url: &str,
        context: &mut RequestContext,
    ) -> Result<Handled, HandlerError> {
        let options = YtdlpOptions {
            format: Some("best[ext=mp4]".to_string()),
            max_filesize: Some(MAX_VIDEO_BYTES),
            ..YtdlpOptions::default()
        };

        let info = ytdlp::download(url, &options, context.scratch_path()).await?;
        let file = info.downloaded_file().ok_or_else(|| {
            HandlerError::Extraction(format!("no video found in {url}"))
        })?;

        let size = tokio::fs::metadata(file).await?.len();
        tracing::info!(size, "downloaded dailymotion video");

        let item = MediaItem::builder()
            .source(MediaSource::Local(file.to_path_buf()))
            .maybe_caption(info.title.clone())
            .original_url(url.to_string())
            .maybe_width(info.width)
            .maybe_height(info.height)
            .build()?;
        context.add_media(item).await?;

        Ok(Handled::Resolved)
    }
}
