use async_trait::async_trait;
use thiserror::Error;

use crate::dispatch::RequestContext;
use crate::extract::ExtractError;
use crate::media::MediaError;
use crate::publish::PublishError;

/// Handler failure reasons. One of these per failed attempt ends up in the
/// request context's error accumulator, tagged with the handler name.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("media too large: {size} bytes (limit {limit})")]
    Oversized { size: u64, limit: u64 },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Successful handler outcome.
///
/// `Declined` is a legitimate "not mine after all" for handlers whose
/// patterns over-match; it is not an error and the dispatcher moves on to
/// the next candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The handler appended media to the context.
    Resolved,
    /// The handler determined the URL is out of scope and appended nothing.
    Declined,
}

/// A pattern-matched, weighted strategy for resolving a URL into media.
///
/// Handlers side-effect only through the request context. They must tolerate
/// being invoked after a previous handler already failed on the same URL,
/// and must not touch shared state outside the context.
#[async_trait]
pub trait UrlHandler: Send + Sync {
    /// Stable identifier, used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Prefix-anchored patterns; the handler is a candidate for a URL if
    /// any pattern matches a prefix of it. No patterns means the handler
    /// never matches.
    fn url_patterns(&self) -> &'static [&'static str];

    /// Priority; higher tries first, negative disables.
    fn weight(&self) -> i32 {
        0
    }

    /// Attempt to resolve `url`, appending media items to `context`.
    async fn handle(
        &self,
        url: &str,
        context: &mut RequestContext,
    ) -> Result<Handled, HandlerError>;
}
