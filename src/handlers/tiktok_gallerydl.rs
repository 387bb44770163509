//! TikTok fallback via gallery-dl
//!
//! Same patterns as the yt-dlp tiktok handler but a lower weight, so it only
//! runs when that one fails or declines. Useful for photo posts and regions
//! where the primary extractor gets rate limited.

use async_trait::async_trait;
use mime::Mime;

use super::traits::{Handled, HandlerError, UrlHandler};
use crate::dispatch::RequestContext;
use crate::extract::gallery_dl;
use crate::media::{MediaItem, MediaSource};

pub struct TiktokGalleryDlHandler;

// entries without a usable mime hint are assumed to be video
fn fallback_mime() -> Mime {
    "video/mp4".parse().unwrap()
}

#[async_trait]
impl UrlHandler for TiktokGalleryDlHandler {
    fn name(&self) -> &'static str {
        "tiktok_gallerydl"
    }

    fn url_patterns(&self) -> &'static [&'static str] {
        &[
            r"^https://(www\.|vm\.)?tiktok\.com/[\w-]+",
            r"^https://(www\.|vm\.)?tiktok\.com/@[\w.-]+/video/\d+",
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
        let dump =
            gallery_dl::dump(url, context.cookie_file("tiktok").as_deref()).await?;
        if dump.is_empty() {
            return Err(HandlerError::Extraction(format!("no data found for {url}")));
        }

        let before = context.media().len();
        for entry in &dump.entries {
            let item = MediaItem::builder()
                .source(MediaSource::Remote(entry.url.clone()))
                .maybe_caption(entry.meta_str("filename").map(str::to_string))
                .original_url(url.to_string())
                .mime_type(entry.mime_hint().unwrap_or_else(fallback_mime))
                .maybe_width(entry.meta_u32("width"))
                .maybe_height(entry.meta_u32("height"))
                .build()?;
            context.add_media(item).await?;
        }

        Ok(if context.media().len() > before {
            Handled::Resolved
        } else {
            Handled::Declined
        })
    }
}
