//! Direct v.redd.it video links, via yt-dlp
//!
//! Lower weight than the main reddit handler: post URLs should go through
//! gallery-dl first, this one catches bare video hosts and acts as the
//! fallback when the post handler fails.

use async_trait::async_trait;

use super::traits::{Handled, HandlerError, UrlHandler};
use crate::dispatch::RequestContext;
use crate::extract::ytdlp::{self, YtdlpOptions};
use crate::media::{MediaItem, MediaSource};

pub struct RedditVideoHandler;

impl RedditVideoHandler {
    /// Try to resolve a direct mp4 URL without downloading anything.
    async fn probe_direct(
        url: &str,
        options: &YtdlpOptions,
    ) -> Option<(String, Option<String>, Option<u32>, Option<u32>)> {
        let info = ytdlp::probe(url, options).await.ok()?;
        let direct = info.mp4_url()?.to_string();
        Some((direct, info.title.clone(), info.width, info.height))
    }
}

#[async_trait]
impl UrlHandler for RedditVideoHandler {
    fn name(&self) -> &'static str {
        "reddit_video"
    }

    fn url_patterns(&self) -> &'static [&'static str] {
        &[r"^https://v\.redd\.it/[\w-]+/?"]
    }

    fn weight(&self) -> i32 {
        500
    }

    async fn handle(
        &self,
        url: &str,
        context: &mut RequestContext,
    ) -> Result<Handled, HandlerError> {
        let options = YtdlpOptions {
            format: Some(
                "bestvideo[ext=mp4][filesize_approx<35M]+bestaudio".to_string(),
            ),
            ..YtdlpOptions::default()
        };

        // a direct mp4 link means no download at all
        if let Some((direct, title, width, height)) =
            Self::probe_direct(url, &options).await
        {
            let item = MediaItem::builder()
                .source(MediaSource::Remote(direct))
                .maybe_caption(title)
                .original_url(url.to_string())
                .maybe_width(width)
                .maybe_height(height)
                .build()?;
            context.add_media(item).await?;
            return Ok(Handled::Resolved);
        }

        let info = ytdlp::download(url, &options, context.scratch_path()).await?;
        let file = info.downloaded_file().ok_or_else(|| {
            HandlerError::Extraction(format!("no video found in {url}"))
        })?;

        let size = tokio::fs::metadata(file).await?.len();
        tracing::info!(size, "downloaded reddit video");

        let item = MediaItem::builder()
            .source(MediaSource::Local(file.to_path_buf()))
            .maybe_caption(info.title.clone())
            .original_url(url.to_string())
            .build()?;
        context.add_media(item).await?;

        Ok(Handled::Resolved)
    }
}
