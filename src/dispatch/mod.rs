//! Request-scoped execution of an ordered candidate list
//!
//! The dispatcher tries candidates strictly in order, never in parallel:
//! first-success short-circuiting makes speculative execution wasteful and
//! would complicate error-ordering guarantees. One candidate's failure is
//! recorded and the next is tried; only the aggregated end state reaches
//! the caller.

mod context;

pub use context::{HandlerFailure, RequestContext};

use std::time::Duration;

use tokio::time::timeout;

use crate::handlers::registry::RegisteredHandler;
use crate::handlers::traits::Handled;

/// Aggregated end state of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler appended at least one media item.
    Resolved,
    /// Candidates were tried and all declined or failed; the context's
    /// error accumulator holds the report.
    Exhausted,
    /// No candidate existed for the URL at all. Distinct from `Exhausted`:
    /// there is nothing to aggregate.
    Unhandled,
}

/// Drives the candidate list for a single request.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    handler_timeout: Duration,
}

impl Dispatcher {
    pub fn new(handler_timeout: Duration) -> Self {
        Self { handler_timeout }
    }

    /// Try each candidate in order against `context`.
    ///
    /// Stops at the first candidate that appends media. A candidate that
    /// declines or appends nothing is skipped silently; a candidate that
    /// fails (or exceeds the per-attempt timeout) has its failure recorded
    /// and never aborts the dispatch.
    pub async fn dispatch(
        &self,
        url: &str,
        candidates: &[&RegisteredHandler],
        context: &mut RequestContext,
    ) -> DispatchOutcome {
        if candidates.is_empty() {
            tracing::info!(url, "no handler found");
            return DispatchOutcome::Unhandled;
        }

        for entry in candidates {
            tracing::debug!(handler = entry.name(), url, "trying handler");

            let attempt = timeout(
                self.handler_timeout,
                entry.handler().handle(url, context),
            )
            .await;

            match attempt {
                Ok(Ok(outcome)) => {
                    if !context.media().is_empty() {
                        tracing::info!(
                            handler = entry.name(),
                            url,
                            count = context.media().len(),
                            "handler resolved url"
                        );
                        return DispatchOutcome::Resolved;
                    }
                    match outcome {
                        Handled::Resolved => tracing::warn!(
                            handler = entry.name(),
                            url,
                            "handler reported success but appended no media"
                        ),
                        Handled::Declined => tracing::debug!(
                            handler = entry.name(),
                            url,
                            "handler declined"
                        ),
                    }
                }
                Ok(Err(err)) => {
                    tracing::warn!(handler = entry.name(), url, error = %err, "handler failed");
                    context.record_failure(entry.name(), err.to_string());
                }
                Err(_) => {
                    tracing::warn!(
                        handler = entry.name(),
                        url,
                        timeout = ?self.handler_timeout,
                        "handler timed out"
                    );
                    context.record_failure(
                        entry.name(),
                        format!("timed out after {:?}", self.handler_timeout),
                    );
                }
            }
        }

        DispatchOutcome::Exhausted
    }
}
