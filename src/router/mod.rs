//! # Router Module
//!
//! Route registration, compilation and the fallback path matcher.
//!
//! ## Overview
//!
//! - [`Router`] collects `(method, path)` registrations, each with its own
//!   middleware list, plus global middleware shared by every route
//! - [`Router::compile`] groups registrations by path into a [`RouteTable`]
//!   whose entries wrap each handler in its full pipeline (context build,
//!   middleware chain, response rendering)
//! - [`RouteTable::dispatch`] matches a request with [`PathPattern`] and runs
//!   the selected [`RouteHandler`]; host listeners can instead take
//!   [`RouteTable::entries`] and do their own matching
//!
//! ## Example
//!
//! ```rust
//! use corridor::dispatcher::handler_fn;
//! use corridor::{Reply, Router};
//! use serde_json::json;
//!
//! let mut router = Router::new();
//! router.get(
//!     "/users/:id",
//!     handler_fn(|ctx| {
//!         Box::pin(async move { Ok(Reply::Json(json!({ "id": ctx.param("id") }))) })
//!     }),
//!     vec![],
//! );
//!
//! let table = router.compile();
//! assert_eq!(table.paths(), vec!["/users/:id"]);
//! ```
//!
//! ## Matching Precedence
//!
//! The fallback matcher tries patterns in table order (first registration of
//! each path) and the first match decides. It does not rank exact paths above
//! parameters above wildcards, so register specific routes first.

mod core;
mod matcher;
mod table;
#[cfg(test)]
mod tests;

pub use core::{RouteMethod, RouteRegistration, Router};
pub use matcher::{PathPattern, WILDCARD_PARAM};
pub use table::{RouteEntry, RouteHandler, RouteMatch, RouteTable};
