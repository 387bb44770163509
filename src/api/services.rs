use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;

use super::{
    error::ApiError,
    models::{HandlerInfo, HealthResponse, MediaPayload, ResolveRequest, ResolveResponse},
    state::AppState,
};
use crate::dispatch::{DispatchOutcome, RequestContext};

/// Primary resolve endpoint (POST /resolve)
///
/// Routes the URL to its ordered candidate handlers and dispatches them in
/// order. Three end states map to three responses:
/// - a handler produced media: 200 with the materialized items in append
///   order
/// - no candidate matched at all: 422, a distinct "no capability exists"
///   outcome with nothing to aggregate
/// - candidates were tried and all declined or failed: 502 carrying every
///   attempted handler's failure reason, in attempt order
pub async fn resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.metrics.url_received();

    let url = request.url.trim().to_string();
    if url.is_empty() {
        return Err(ApiError::InvalidPayload("url must not be empty".to_string()));
    }
    tracing::debug!(url, "received resolve request");

    let candidates = state.router.get_handlers(&url);
    let mut context = RequestContext::new(
        state.publisher.clone(),
        &state.config.resolver,
    )
    .map_err(|e| ApiError::Internal(format!("failed to create request context: {e}")))?;

    let outcome = state
        .dispatcher
        .dispatch(&url, &candidates, &mut context)
        .await;
    state.metrics.handler_failures(context.errors().len() as u64);

    match outcome {
        DispatchOutcome::Resolved => {
            state.metrics.url_resolved();
            let media: Vec<MediaPayload> =
                context.media().iter().map(MediaPayload::from).collect();
            Ok(Json(ResolveResponse {
                url,
                media,
                resolved_at: Utc::now(),
            }))
        }
        DispatchOutcome::Unhandled => {
            state.metrics.url_unhandled();
            Err(ApiError::UnhandledUrl(url))
        }
        DispatchOutcome::Exhausted => {
            let report = if context.errors().is_empty() {
                "every matching handler declined the url".to_string()
            } else {
                context.error_report()
            };
            Err(ApiError::ExtractionFailed(report))
        }
    }
}

/// Registry introspection (GET /handlers), disabled handlers included.
pub async fn list_handlers(State(state): State<AppState>) -> Json<Vec<HandlerInfo>> {
    let handlers = state
        .router
        .registry()
        .entries()
        .iter()
        .map(HandlerInfo::from)
        .collect();
    Json(handlers)
}

/// Liveness probe (GET /health)
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        handlers: state.router.registry().len(),
        metrics: state.metrics.snapshot(),
    })
}
