//! URL handler system
//!
//! A handler is a named, weighted strategy for turning a URL into media
//! items. All known handlers live in the [`HandlerRegistry`], built once at
//! startup; the [`Router`] filters and orders them per URL, and the
//! dispatcher (see [`crate::dispatch`]) executes the resulting candidate
//! list.
//!
//! ## Key components
//!
//! - [`UrlHandler`] - trait every strategy implements
//! - [`HandlerRegistry`] - init-time registration of all strategies
//! - [`Router`] - per-URL candidate selection and ordering
//!
//! Built-in strategies cover reddit, twitter/x, tiktok (with a gallery-dl
//! fallback tier), youtube shorts, dailymotion, instagram and v.redd.it;
//! each is a thin adapter over yt-dlp or gallery-dl (see [`crate::extract`]).

mod dailymotion;
mod instagram;
mod reddit;
mod reddit_video;
pub(crate) mod registry;
pub(crate) mod router;
mod tiktok;
mod tiktok_gallerydl;
pub(crate) mod traits;
mod twitter;
mod youtube;

pub use dailymotion::DailymotionHandler;
pub use instagram::InstagramHandler;
pub use reddit::RedditHandler;
pub use reddit_video::RedditVideoHandler;
pub use registry::{HandlerRegistry, RegisteredHandler, RegistryError};
pub use router::Router;
pub use tiktok::TiktokHandler;
pub use tiktok_gallerydl::TiktokGalleryDlHandler;
pub use traits::{Handled, HandlerError, UrlHandler};
pub use twitter::TwitterHandler;
pub use youtube::YoutubeShortHandler;
