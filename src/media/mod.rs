//! Media items produced by URL handlers
//!
//! A [`MediaItem`] is one resolved piece of content. Its source is either a
//! remote URL or a local artifact downloaded into the request scratch dir;
//! local sources must be published through a
//! [`MediaPublisher`](crate::publish::MediaPublisher) before the item is
//! visible in results (see [`RequestContext`](crate::dispatch::RequestContext)).

use std::path::{Path, PathBuf};

use bon::bon;
use mime::Mime;
use thiserror::Error;
use url::Url;

use crate::util::{clean_url, truncate_caption};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("could not determine mime type for {0}")]
    UnknownMimeType(String),

    #[error("invalid source url: {0}")]
    InvalidSourceUrl(String),
}

/// Where the media bytes live right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Already hosted somewhere fetchable.
    Remote(String),
    /// Sitting in the request scratch directory, needs publishing.
    Local(PathBuf),
}

impl MediaSource {
    pub fn describe(&self) -> String {
        match self {
            MediaSource::Remote(url) => url.clone(),
            MediaSource::Local(path) => path.display().to_string(),
        }
    }
}

const DEFAULT_CAPTION: &str = "Some unknown media";

/// One resolved piece of content.
///
/// Never mutated after materialization; the only post-construction write is
/// the publish handle set by the request context.
#[derive(Debug, Clone)]
pub struct MediaItem {
    source: MediaSource,
    caption: String,
    original_url: Option<String>,
    mime_type: Mime,
    width: Option<u32>,
    height: Option<u32>,
    handle: Option<String>,
}

#[bon]
impl MediaItem {
    /// Build a media item, resolving its MIME type.
    ///
    /// The MIME type comes from the explicit `mime_type` if given, otherwise
    /// it is inferred from the source's file extension. An unresolvable MIME
    /// type fails construction; it is not a warning.
    #[builder]
    pub fn new(
        source: MediaSource,
        caption: Option<String>,
        original_url: Option<String>,
        mime_type: Option<Mime>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Self, MediaError> {
        let mime_type = match mime_type {
            Some(mime) => mime,
            None => infer_mime(&source)?,
        };

        Ok(Self {
            source,
            caption: caption
                .map(|c| truncate_caption(&c))
                .unwrap_or_else(|| DEFAULT_CAPTION.to_string()),
            original_url: original_url.map(|u| clean_url(&u)),
            mime_type,
            width,
            height,
            handle: None,
        })
    }
}

impl MediaItem {
    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn original_url(&self) -> Option<&str> {
        self.original_url.as_deref()
    }

    pub fn mime_type(&self) -> &Mime {
        &self.mime_type
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn is_local(&self) -> bool {
        matches!(self.source, MediaSource::Local(_))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.type_() == mime::IMAGE
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.type_() == mime::VIDEO
    }

    /// Externally-referenceable handle, set once during materialization.
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    pub(crate) fn set_handle(&mut self, handle: String) {
        self.handle = Some(handle);
    }
}

/// Infer a MIME type from the file extension of the source.
fn infer_mime(source: &MediaSource) -> Result<Mime, MediaError> {
    let guess = match source {
        MediaSource::Remote(raw) => {
            let url = Url::parse(raw)
                .map_err(|_| MediaError::InvalidSourceUrl(raw.clone()))?;
            mime_guess::from_path(Path::new(url.path())).first()
        }
        MediaSource::Local(path) => mime_guess::from_path(path).first(),
    };
    guess.ok_or_else(|| MediaError::UnknownMimeType(source.describe()))
}
