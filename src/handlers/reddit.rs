//! Reddit posts and galleries, via gallery-dl

use async_trait::async_trait;

use super::traits::{Handled, HandlerError, UrlHandler};
use crate::dispatch::RequestContext;
use crate::extract::{content_length, gallery_dl};
use crate::media::{MediaItem, MediaSource};
use crate::util::clean_url;

pub struct RedditHandler {
    http: reqwest::Client,
}

impl RedditHandler {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for RedditHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlHandler for RedditHandler {
    fn name(&self) -> &'static str {
        "reddit"
    }

    fn url_patterns(&self) -> &'static [&'static str] {
        &[
            r"^https://(www\.|old\.)?reddit\.com/r/[\w-]+/comments/[\w-]+/[\w-]+/?",
            r"^https://(www\.|old\.)?reddit\.com/gallery/[\w-]+/?",
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
        let dump =
            gallery_dl::dump(url, context.cookie_file(self.name()).as_deref()).await?;
        if dump.is_empty() {
            return Err(HandlerError::Extraction(format!("no data found for {url}")));
        }

        let title = dump.meta_str("title").unwrap_or("Downloaded media");
        let caption = format!("{}\n{}", clean_url(url), title);

        let before = context.media().len();
        for entry in &dump.entries {
            // skip entries over the size cap when the server reports one
            if let Ok(Some(size)) = content_length(&self.http, &entry.url).await {
                if size > context.max_file_bytes() {
                    tracing::warn!(
                        url = entry.url,
                        size,
                        limit = context.max_file_bytes(),
                        "skipping oversized reddit media"
                    );
                    continue;
                }
            }

            let item = MediaItem::builder()
                .source(MediaSource::Remote(entry.url.clone()))
                .caption(caption.clone())
                .maybe_mime_type(entry.mime_hint())
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
