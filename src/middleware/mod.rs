//! # Middleware Module
//!
//! The [`Middleware`] contract and a handful of general-purpose middleware
//! built on it.
//!
//! - [`Recover`] - converts downstream errors into a generic 500; register first
//! - [`TracingMiddleware`] - request span, latency and `x-request-id` echo
//! - [`MetricsMiddleware`] - request/error counters and average latency
//! - [`CorsMiddleware`] - preflight handling and CORS response headers

mod core;
mod cors;
mod metrics;
mod recover;
mod tracing;

pub use core::{from_fn, named, FnMiddleware, Middleware};
pub use cors::CorsMiddleware;
pub use metrics::MetricsMiddleware;
pub use recover::Recover;
pub use tracing::TracingMiddleware;
