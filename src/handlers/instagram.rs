//! Instagram reels and single-video posts, via yt-dlp
//!
//! Multi-image posts are out of scope here; the lower weight leaves room
//! for a dedicated gallery handler to outrank this one.

use async_trait::async_trait;

use super::traits::{Handled, HandlerError, UrlHandler};
use crate::dispatch::RequestContext;
use crate::extract::ytdlp::{self, YtdlpOptions};
use crate::media::{MediaItem, MediaSource};
use crate::util::clean_url;

pub struct InstagramHandler;

#[async_trait]
impl UrlHandler for InstagramHandler {
    fn name(&self) -> &'static str {
        "instagram"
    }

    fn url_patterns(&self) -> &'static [&'static str] {
        &[
            r"^https://(www\.)?instagram\.com/(share/)?reel/[\w-]+",
            r"^https://(www\.)?instagram\.com/p/[\w-]+",
        ]
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
            cookie_file: context.cookie_file(self.name()),
            ..YtdlpOptions::default()
        };

        let info = ytdlp::download(url, &options, context.scratch_path()).await?;
        let file = info.downloaded_file().ok_or_else(|| {
            HandlerError::Extraction(format!("no video found in {url}"))
        })?;

        let size = tokio::fs::metadata(file).await?.len();
        if size > context.max_file_bytes() {
            return Err(HandlerError::Oversized {
                size,
                limit: context.max_file_bytes(),
            });
        }
        tracing::info!(size, "downloaded instagram video");

        let title = info.title.as_deref().unwrap_or("Downloaded video");
        let item = MediaItem::builder()
            .source(MediaSource::Local(file.to_path_buf()))
            .caption(format!("{}\n{}", clean_url(url), title))
            .build()?;
        context.add_media(item).await?;

        Ok(Handled::Resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::registry::HandlerRegistry;
    use std::sync::Arc;

    #[test]
    fn patterns_match_reels_and_posts() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(InstagramHandler)).unwrap();
        let entry = &registry.entries()[0];

        assert!(entry.matches("https://www.instagram.com/reel/Cabc123xyz/"));
        assert!(entry.matches("https://instagram.com/share/reel/Cabc123xyz"));
        assert!(entry.matches("https://www.instagram.com/p/Cabc123xyz/?igsh=1"));
        assert!(!entry.matches("https://www.instagram.com/someone/"));
    }
}
