use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;

use super::Middleware;
use crate::context::RequestContext;
use crate::dispatcher::Next;
use crate::reply::Reply;

/// Request counters kept with relaxed atomics.
///
/// Latency covers everything downstream of this middleware. A request whose
/// chain returned an error counts towards both `request_count` and
/// `error_count`. Register the same `Arc` on several routers to aggregate.
#[derive(Debug, Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    error_count: AtomicUsize,
    total_latency_ns: AtomicU64,
}

impl MetricsMiddleware {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Mean downstream latency, zero before the first request.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
    }
}

impl Middleware for MetricsMiddleware {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, anyhow::Result<Reply>> {
        Box::pin(async move {
            let start = Instant::now();
            let result = next.run(ctx).await;
            let nanos = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
            self.total_latency_ns.fetch_add(nanos, Ordering::Relaxed);
            self.request_count.fetch_add(1, Ordering::Relaxed);
            if result.is_err() {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
            result.map(|()| Reply::Empty)
        })
    }

    fn name(&self) -> &str {
        "metrics"
    }
}
