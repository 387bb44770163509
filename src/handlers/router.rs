use std::cmp::Reverse;
use std::sync::Arc;

use url::Url;

use super::registry::{HandlerRegistry, RegisteredHandler};

/// Routes a URL to the ordered list of handlers that may resolve it.
///
/// Returning a list rather than a single best match is the point: handlers
/// are brittle (rate limits, layout changes, oversized media), so the
/// dispatcher needs fallback candidates when the best one fails.
#[derive(Clone)]
pub struct Router {
    registry: Arc<HandlerRegistry>,
}

impl Router {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Enabled handlers matching `url`, sorted by weight descending; ties
    /// keep registration order (the sort must stay stable, handler authors
    /// rely on it).
    ///
    /// An empty result is a valid outcome meaning "no capability can handle
    /// this URL", including for malformed input.
    pub fn get_handlers(&self, url: &str) -> Vec<&RegisteredHandler> {
        if !is_valid_url(url) {
            tracing::warn!(url, "invalid url, no handlers selected");
            return Vec::new();
        }

        let mut candidates: Vec<&RegisteredHandler> = self
            .registry
            .entries()
            .iter()
            .filter(|entry| entry.is_enabled() && entry.matches(url))
            .collect();
        candidates.sort_by_key(|entry| Reverse(entry.weight()));

        tracing::debug!(url, count = candidates.len(), "handlers selected");
        candidates
    }
}

/// A routable URL needs both a host and a path.
///
/// The parser normalizes an absent path to "/", so a bare domain has to be
/// rejected explicitly; no handler targets a site root.
fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.has_host() && parsed.path() != "/",
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::RequestContext;
    use crate::handlers::traits::{Handled, HandlerError, UrlHandler};
    use async_trait::async_trait;

    struct FakeHandler {
        name: &'static str,
        patterns: &'static [&'static str],
        weight: i32,
    }

    #[async_trait]
    impl UrlHandler for FakeHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        fn url_patterns(&self) -> &'static [&'static str] {
            self.patterns
        }

        fn weight(&self) -> i32 {
            self.weight
        }

        async fn handle(
            &self,
            _url: &str,
            _context: &mut RequestContext,
        ) -> Result<Handled, HandlerError> {
            Ok(Handled::Declined)
        }
    }

    fn router_with(handlers: Vec<FakeHandler>) -> Router {
        let mut registry = HandlerRegistry::new();
        for handler in handlers {
            registry.register(Arc::new(handler)).unwrap();
        }
        Router::new(Arc::new(registry))
    }

    fn names(candidates: &[&RegisteredHandler]) -> Vec<String> {
        candidates.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn orders_by_weight_descending() {
        let router = router_with(vec![
            FakeHandler {
                name: "b",
                patterns: &["^https://example\\.com/"],
                weight: 500,
            },
            FakeHandler {
                name: "a",
                patterns: &["^https://example\\.com/media/"],
                weight: 1000,
            },
        ]);

        let candidates = router.get_handlers("https://example.com/media/123");
        assert_eq!(names(&candidates), ["a", "b"]);
    }

    #[test]
    fn ties_keep_registration_order() {
        let router = router_with(vec![
            FakeHandler {
                name: "first",
                patterns: &["^https://example\\.com/"],
                weight: 100,
            },
            FakeHandler {
                name: "second",
                patterns: &["^https://example\\.com/"],
                weight: 100,
            },
            FakeHandler {
                name: "third",
                patterns: &["^https://example\\.com/"],
                weight: 100,
            },
        ]);

        let candidates = router.get_handlers("https://example.com/x");
        assert_eq!(names(&candidates), ["first", "second", "third"]);
    }

    #[test]
    fn negative_weight_is_never_selected() {
        let router = router_with(vec![FakeHandler {
            name: "disabled",
            patterns: &["^https://example\\.com/"],
            weight: -1,
        }]);

        assert!(router.get_handlers("https://example.com/x").is_empty());
    }

    #[test]
    fn non_matching_handlers_are_excluded() {
        let router = router_with(vec![
            FakeHandler {
                name: "matches",
                patterns: &["^https://example\\.com/"],
                weight: 0,
            },
            FakeHandler {
                name: "other-site",
                patterns: &["^https://other\\.example\\.net/"],
                weight: 1000,
            },
        ]);

        let candidates = router.get_handlers("https://example.com/x");
        assert_eq!(names(&candidates), ["matches"]);
    }

    #[test]
    fn invalid_url_yields_empty_without_error() {
        let router = router_with(vec![FakeHandler {
            name: "h",
            patterns: &["^not-a-url"],
            weight: 0,
        }]);

        assert!(router.get_handlers("not-a-url").is_empty());
        assert!(router.get_handlers("").is_empty());
    }

    #[test]
    fn bare_domain_is_not_routable() {
        let router = router_with(vec![FakeHandler {
            name: "h",
            patterns: &["^https://example\\.com"],
            weight: 0,
        }]);

        assert!(router.get_handlers("https://example.com").is_empty());
        assert!(router.get_handlers("https://example.com/").is_empty());
        assert!(!router.get_handlers("https://example.com/x").is_empty());
    }

    #[test]
    fn routing_is_idempotent() {
        let router = router_with(vec![
            FakeHandler {
                name: "a",
                patterns: &["^https://example\\.com/"],
                weight: 10,
            },
            FakeHandler {
                name: "b",
                patterns: &["^https://example\\.com/"],
                weight: 10,
            },
        ]);

        let first = names(&router.get_handlers("https://example.com/x"));
        let second = names(&router.get_handlers("https://example.com/x"));
        assert_eq!(first, second);
    }
}
