//! # corridor
//!
//! **corridor** is the request-dispatch core of an HTTP framework: route
//! registration, a middleware chain engine, per-request context construction
//! and response rendering. It has no listener of its own; a host server hands
//! it `http::Request<Vec<u8>>` values and sends back the
//! `http::Response<Vec<u8>>` it produces.
//!
//! ## Architecture
//!
//! - **[`router`]** - route registry, compiled route table and the fallback
//!   path matcher
//! - **[`dispatcher`]** - the middleware execution engine ([`dispatcher::Chain`],
//!   [`dispatcher::Next`]) and the [`dispatcher::Handler`] trait
//! - **[`context`]** - per-request [`RequestContext`] and the task-local
//!   correlation scope
//! - **[`server`]** - [`ResponseSetter`], the response builder and the
//!   outermost `serve` entry point
//! - **[`middleware`]** - the [`Middleware`] contract plus recover, tracing,
//!   metrics and CORS middleware
//! - **[`cookies`]** - inbound cookie parsing and `Set-Cookie` serialization
//! - **[`runtime_config`]** / **[`logging`]** - environment and TOML
//!   configuration, `tracing` subscriber setup
//!
//! ## Request Flow
//!
//! ```text
//! Request ──► RouteTable::find ──► RequestContext::build ──► scope::run(
//!                                                              global mw → route mw → handler
//!                                                            ) ──► build_response ──► Response
//! ```
//!
//! Middleware runs before and after everything downstream of it, may
//! short-circuit by not running `next`, and may replace the pipeline result
//! by returning a non-empty [`Reply`]. Errors propagate unchanged to the
//! caller of dispatch unless an upstream middleware such as
//! [`middleware::Recover`] absorbs them.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use corridor::dispatcher::handler_fn;
//! use corridor::middleware::{Recover, TracingMiddleware};
//! use corridor::{Reply, Router};
//! use serde_json::json;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut router = Router::new();
//! router.add_middleware(Arc::new(Recover));
//! router.add_middleware(Arc::new(TracingMiddleware));
//! router.get(
//!     "/users/:id",
//!     handler_fn(|ctx| {
//!         Box::pin(async move { Ok(Reply::Json(json!({ "id": ctx.param("id") }))) })
//!     }),
//!     vec![],
//! );
//!
//! let request = http::Request::get("/users/42").body(Vec::new())?;
//! let response = router.dispatch(request).await?;
//! assert_eq!(response.status(), 200);
//! assert_eq!(response.body(), br#"{"id":"42"}"#);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod cookies;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod reply;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use context::RequestContext;
pub use middleware::Middleware;
pub use reply::Reply;
pub use router::{RouteTable, Router};
pub use runtime_config::RuntimeConfig;
pub use server::{Content, ResponseSetter};
