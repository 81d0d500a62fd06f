//! # Dispatcher Module
//!
//! The middleware execution engine. A [`Chain`] is the concatenation of the
//! router's global middleware (registration order), the route's own
//! middleware (list order) and a terminal [`Handler`].
//!
//! ## Execution
//!
//! Running a chain advances a cursor from 0. Each step either invokes the
//! middleware at the cursor with a [`Next`] pointing one past it, or, once the
//! cursor reaches the end, invokes the handler. A shared result slot records
//! the handler's reply and any non-empty reply a middleware returns; after the
//! outermost step completes, the slot is the pipeline result.
//!
//! - **Short-circuit**: a middleware that never runs `next` stops the chain;
//!   its own reply becomes the result.
//! - **Before/after**: code before `next.run(ctx).await` sees the request on
//!   the way in, code after it sees the response configuration the rest of
//!   the chain left behind.
//! - **Errors**: propagate out of `next.run` and out of [`Chain::run`]
//!   untouched. Recovery is only possible in an upstream middleware that
//!   inspects the result of `next.run`.
//!
//! ```rust
//! use corridor::dispatcher::{handler_fn, Chain};
//! use corridor::middleware::{from_fn, Middleware};
//! use corridor::Reply;
//! use std::sync::Arc;
//!
//! let timing: Arc<dyn Middleware> = Arc::new(from_fn(|ctx, next| {
//!     Box::pin(async move {
//!         next.run(ctx).await?;
//!         ctx.set.header("x-handled", "1");
//!         Ok(Reply::Empty)
//!     })
//! }));
//! let chain = Chain::new(
//!     vec![timing],
//!     Arc::new(handler_fn(|_ctx| Box::pin(async { Ok(Reply::text("ok")) }))),
//! );
//! assert_eq!(chain.middleware_count(), 1);
//! ```

mod core;

pub use core::{handler_fn, sync_handler, Chain, FnHandler, Handler, Next, SyncHandler};
