use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::handlers::{HandlerRegistry, Router};
use crate::observability::Metrics;
use crate::publish::MediaPublisher;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub router: Router,
    pub dispatcher: Dispatcher,
    pub publisher: Arc<dyn MediaPublisher>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: HandlerRegistry,
        publisher: Arc<dyn MediaPublisher>,
    ) -> Self {
        let dispatcher = Dispatcher::new(config.resolver.handler_timeout());
        Self {
            config: Arc::new(config),
            router: Router::new(Arc::new(registry)),
            dispatcher,
            publisher,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
