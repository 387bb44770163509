use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use super::traits::UrlHandler;
use crate::config::Config;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("handler {name}: invalid url pattern {pattern:?}: {source}")]
    InvalidPattern {
        name: String,
        pattern: String,
        source: regex::Error,
    },
}

/// A handler plus its compiled patterns and effective weight.
pub struct RegisteredHandler {
    name: String,
    patterns: Vec<Regex>,
    weight: i32,
    handler: Arc<dyn UrlHandler>,
}

impl RegisteredHandler {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Disabled handlers stay registered for introspection but are never
    /// candidates.
    pub fn is_enabled(&self) -> bool {
        self.weight >= 0
    }

    pub fn pattern_strings(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|re| re.as_str())
    }

    /// Prefix-anchored match: a pattern matches if it matches starting at
    /// the first byte of the URL; trailing content is accepted.
    pub fn matches(&self, url: &str) -> bool {
        self.patterns
            .iter()
            .any(|re| re.find(url).is_some_and(|m| m.start() == 0))
    }

    pub fn handler(&self) -> &dyn UrlHandler {
        self.handler.as_ref()
    }
}

/// All known handlers, built once at startup and immutable afterwards.
///
/// Registration order matters: it is the tie-break for equal weights.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: Vec<RegisteredHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler with its declared weight.
    pub fn register(&mut self, handler: Arc<dyn UrlHandler>) -> Result<(), RegistryError> {
        self.register_with_weight(handler, None)
    }

    /// Register a handler, optionally overriding its declared weight.
    ///
    /// A malformed pattern is fatal: an incomplete registry is worse than
    /// refusing to start.
    pub fn register_with_weight(
        &mut self,
        handler: Arc<dyn UrlHandler>,
        weight_override: Option<i32>,
    ) -> Result<(), RegistryError> {
        let name = handler.name().to_string();
        let weight = weight_override.unwrap_or_else(|| handler.weight());

        let mut patterns = Vec::with_capacity(handler.url_patterns().len());
        for pattern in handler.url_patterns() {
            let compiled =
                Regex::new(pattern).map_err(|source| RegistryError::InvalidPattern {
                    name: name.clone(),
                    pattern: (*pattern).to_string(),
                    source,
                })?;
            patterns.push(compiled);
        }

        if patterns.is_empty() {
            tracing::warn!(handler = %name, "handler has no url patterns and will never match");
        } else if weight < 0 {
            tracing::info!(handler = %name, weight, "handler registered disabled");
        } else {
            tracing::info!(
                handler = %name,
                weight,
                patterns = ?handler.url_patterns(),
                "handler registered"
            );
        }

        self.entries.push(RegisteredHandler {
            name,
            patterns,
            weight,
            handler,
        });
        Ok(())
    }

    /// All registered handlers, in registration order, disabled included.
    pub fn entries(&self) -> &[RegisteredHandler] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registry with every built-in handler, applying weight overrides from
    /// config. This is the single discovery point: a strategy is known to
    /// the system if and only if it is listed here.
    pub fn with_builtins(config: &Config) -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        let builtins: Vec<Arc<dyn UrlHandler>> = vec![
            Arc::new(super::reddit::RedditHandler::new()),
            Arc::new(super::twitter::TwitterHandler::new()),
            Arc::new(super::tiktok::TiktokHandler),
            Arc::new(super::youtube::YoutubeShortHandler),
            Arc::new(super::dailymotion::DailymotionHandler),
            Arc::new(super::instagram::InstagramHandler),
            Arc::new(super::reddit_video::RedditVideoHandler),
            Arc::new(super::tiktok_gallerydl::TiktokGalleryDlHandler),
        ];

        for handler in builtins {
            let weight_override = config.handler_weight_override(handler.name());
            registry.register_with_weight(handler, weight_override)?;
        }

        Ok(registry)
    }
}
