use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::media::{MediaItem, MediaSource};
use crate::publish::{MediaPublisher, PublishError};
use crate::scratch::ScratchDir;
use crate::util::cookie_file_path;

/// One failed handler attempt, tagged with the handler name.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    pub handler: String,
    pub reason: String,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler {} failed: {}", self.handler, self.reason)
    }
}

/// Per-request accumulator threaded through every handler attempt.
///
/// Exclusively owned by one in-flight request; handlers get it as a mutable
/// borrow and side-effect only through it. The scratch dir is removed when
/// the context is dropped.
pub struct RequestContext {
    media: Vec<MediaItem>,
    errors: Vec<HandlerFailure>,
    scratch: ScratchDir,
    publisher: Arc<dyn MediaPublisher>,
    cookies_dir: Option<PathBuf>,
    max_file_bytes: u64,
}

impl RequestContext {
    pub fn new(
        publisher: Arc<dyn MediaPublisher>,
        resolver: &ResolverConfig,
    ) -> io::Result<Self> {
        Ok(Self {
            media: Vec::new(),
            errors: Vec::new(),
            scratch: ScratchDir::create(&resolver.scratch_dir)?,
            publisher,
            cookies_dir: resolver.cookies_dir.clone(),
            max_file_bytes: resolver.max_file_bytes.as_u64(),
        })
    }

    /// Materialize `item` if needed, then append it.
    ///
    /// Local artifacts are published exactly once, here, before the item
    /// becomes visible in results; remote sources pass through with their
    /// URL as the handle. Items are never mutated afterwards.
    pub async fn add_media(&mut self, mut item: MediaItem) -> Result<(), PublishError> {
        let handle = match item.source() {
            MediaSource::Local(path) => {
                self.publisher.publish(path, item.mime_type()).await?
            }
            MediaSource::Remote(url) => url.clone(),
        };
        item.set_handle(handle);
        self.media.push(item);
        Ok(())
    }

    /// Accumulated media, in the order the winning handler appended it.
    pub fn media(&self) -> &[MediaItem] {
        &self.media
    }

    /// Accumulated failures, in attempt order.
    pub fn errors(&self) -> &[HandlerFailure] {
        &self.errors
    }

    pub(crate) fn record_failure(&mut self, handler: &str, reason: String) {
        self.errors.push(HandlerFailure {
            handler: handler.to_string(),
            reason,
        });
    }

    /// Human-readable report concatenating every attempted handler's
    /// failure reason, in attempt order.
    pub fn error_report(&self) -> String {
        self.errors
            .iter()
            .map(HandlerFailure::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// This request's private scratch directory.
    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    /// Cookie file for a handler, if the operator provided one.
    pub fn cookie_file(&self, handler: &str) -> Option<PathBuf> {
        cookie_file_path(self.cookies_dir.as_deref(), handler)
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }
}
