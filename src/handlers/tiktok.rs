//! TikTok videos, via yt-dlp into the request scratch dir

use async_trait::async_trait;

use super::traits::{Handled, HandlerError, UrlHandler};
use crate::dispatch::RequestContext;
use crate::extract::ytdlp::{self, YtdlpOptions};
use crate::media::{MediaItem, MediaSource};

pub struct TiktokHandler;

#[async_trait]
impl UrlHandler for TiktokHandler {
    fn name(&self) -> &'static str {
        "tiktok"
    }

    fn url_patterns(&self) -> &'static [&'static str] {
        &[
            r"^https://(www\.|vm\.)?tiktok\.com/[\w-]+",
            r"^https://(www\.|vm\.)?tiktok\.com/@[\w.-]+/video/\d+",
        ]
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
            format: Some("best[ext=mp4][filesize<10M]/best[filesize<10M]".to_string()),
            max_filesize: Some(context.max_file_bytes()),
            cookie_file: context.cookie_file(self.name()),
            ..YtdlpOptions::default()
        };

        let info = ytdlp::download(url, &options, context.scratch_path()).await?;
        let file = info.downloaded_file().ok_or_else(|| {
            HandlerError::Extraction(format!(
                "no video found in {url}, perhaps it is too big?"
            ))
        })?;

        let size = tokio::fs::metadata(file).await?.len();
        tracing::info!(size, "downloaded tiktok video");

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
