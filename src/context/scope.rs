//! Per-request correlation state.
//!
//! Each dispatched request runs inside its own tokio task-local scope, so two
//! requests interleaved on the same runtime never observe each other's values.
//! Outside of a dispatched request every accessor returns `None`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::ids::RequestId;

tokio::task_local! {
    static REQUEST_SCOPE: RefCell<RequestScope>;
}

/// Correlation data for a single request.
#[derive(Debug, Clone)]
pub struct RequestScope {
    request_id: RequestId,
    started_at: Instant,
    values: HashMap<String, String>,
}

impl RequestScope {
    #[must_use]
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            started_at: Instant::now(),
            values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }
}

/// Run `fut` with `scope` installed as the current request scope.
pub async fn run<F: Future>(scope: RequestScope, fut: F) -> F::Output {
    REQUEST_SCOPE.scope(RefCell::new(scope), fut).await
}

/// Correlation id of the request being dispatched on this task.
#[must_use]
pub fn request_id() -> Option<RequestId> {
    REQUEST_SCOPE
        .try_with(|scope| scope.borrow().request_id)
        .ok()
}

/// Time since the current request's context was built.
#[must_use]
pub fn elapsed() -> Option<Duration> {
    REQUEST_SCOPE
        .try_with(|scope| scope.borrow().started_at.elapsed())
        .ok()
}

/// Store a value for the rest of this request. Returns `false` outside a request.
pub fn set_value(key: impl Into<String>, value: impl Into<String>) -> bool {
    let (key, value) = (key.into(), value.into());
    REQUEST_SCOPE
        .try_with(move |scope| {
            scope.borrow_mut().values.insert(key, value);
        })
        .is_ok()
}

#[must_use]
pub fn value(key: &str) -> Option<String> {
    REQUEST_SCOPE
        .try_with(|scope| scope.borrow().values.get(key).cloned())
        .ok()
        .flatten()
}
