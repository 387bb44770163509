use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::info;

use super::{
    services::{health, list_handlers, resolve},
    state::AppState,
};
use crate::config::{Config, PublishConfig, PublishProvider};
use crate::handlers::HandlerRegistry;
use crate::publish::{MediaPublisher, StorePublisher};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the publish backend from config.
pub fn build_publisher(publish: &PublishConfig) -> Result<Arc<dyn MediaPublisher>, AnyError> {
    match publish.provider {
        PublishProvider::Memory => Ok(Arc::new(StorePublisher::in_memory())),
        PublishProvider::Local => {
            let root = publish
                .root
                .as_deref()
                .ok_or("publish.root is required for the local provider")?;
            Ok(Arc::new(StorePublisher::local(
                root,
                publish.public_base_url.clone(),
            )?))
        }
    }
}

/// Assemble the full application router.
pub fn app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/resolve", post(resolve))
        .route("/handlers", get(list_handlers))
        .route("/health", get(health))
        .with_state(state)
        // Automatically decompress gzip/deflate/brotli request bodies
        .layer(RequestDecompressionLayer::new())
}

/// Run the HTTP server until shutdown.
///
/// Registry construction happens before the listener binds; a discovery
/// failure aborts startup, a partially-populated registry would silently
/// under-serve every future request.
pub async fn run(address: Option<SocketAddr>) -> Result<(), AnyError> {
    info!("loading configuration");
    let config = Config::load()?;

    let registry = HandlerRegistry::with_builtins(&config)?;
    info!(handlers = registry.len(), "handler registry built");

    let publisher = build_publisher(&config.publish)?;

    let address = address.unwrap_or(config.server.bind_addr);
    let state = AppState::new(config, registry, publisher);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "delinkify API listening");

    axum::serve(listener, app(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
