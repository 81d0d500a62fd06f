use std::time::Instant;

use futures::future::BoxFuture;
use tracing::field::Empty;
use tracing::{info, info_span, warn, Instrument};

use super::Middleware;
use crate::context::{scope, RequestContext};
use crate::dispatcher::Next;
use crate::reply::Reply;

/// Wraps the downstream chain in a `request` span and echoes the correlation
/// id back in an `x-request-id` response header.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, anyhow::Result<Reply>> {
        let request_id = scope::request_id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        let span = info_span!(
            "request",
            method = %ctx.request.method(),
            path = %ctx.request.uri().path(),
            request_id = %request_id,
            status = Empty,
            latency_ms = Empty,
        );

        Box::pin(async move {
            let start = Instant::now();
            let result = next.run(ctx).instrument(span.clone()).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            span.record("status", u64::from(ctx.set.status));
            span.record("latency_ms", latency_ms);
            if !request_id.is_empty() {
                ctx.set.header("x-request-id", request_id.as_str());
            }

            match &result {
                Ok(()) => {
                    info!(
                        parent: &span,
                        status = ctx.set.status,
                        latency_ms,
                        "Request completed"
                    );
                }
                Err(e) => warn!(parent: &span, latency_ms, error = %e, "Request failed downstream"),
            }
            result.map(|()| Reply::Empty)
        })
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
