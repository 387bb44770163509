//! YouTube shorts, via yt-dlp

use async_trait::async_trait;

use super::traits::{Handled, HandlerError, UrlHandler};
use crate::dispatch::RequestContext;
use crate::extract::ytdlp::{self, YtdlpOptions};
use crate::media::{MediaItem, MediaSource};
use crate::util::clean_url;

pub struct YoutubeShortHandler;

#[async_trait]
impl UrlHandler for YoutubeShortHandler {
    fn name(&self) -> &'static str {
        "youtube_short"
    }

    fn url_patterns(&self) -> &'static [&'static str] {
        &[r"^https://(www\.)?youtube\.com/shorts/[\w-]+"]
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
            max_filesize: Some(context.max_file_bytes()),
            // the web player client dodges signature throttling on shorts
            extractor_args: Some("youtube:player_client=web".to_string()),
            ..YtdlpOptions::default()
        };

        let info = ytdlp::download(url, &options, context.scratch_path()).await?;
        let file = info.downloaded_file().ok_or_else(|| {
            HandlerError::Extraction(format!("no video found in {url}"))
        })?;

        let size = tokio::fs::metadata(file).await?.len();
        tracing::info!(size, "downloaded youtube short");

        let title = info.title.as_deref().unwrap_or("Downloaded video");
        let item = MediaItem::builder()
            .source(MediaSource::Local(file.to_path_buf()))
            .caption(format!("{}\n{}", clean_url(url), title))
            .maybe_width(info.width)
            .maybe_height(info.height)
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
    fn patterns_match_shorts_only() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(YoutubeShortHandler)).unwrap();
        let entry = &registry.entries()[0];

        assert!(entry.matches("https://www.youtube.com/shorts/dQw4w9WgXcQ"));
        assert!(entry.matches("https://youtube.com/shorts/dQw4w9WgXcQ?feature=share"));
        assert!(!entry.matches("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }
}
