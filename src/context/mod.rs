//! # Context Module
//!
//! Turns a raw inbound request into a [`RequestContext`]: path parameters from
//! the active matcher, the query string as a flat map, a body parsed according
//! to its content type, the cookie jar, and a fresh
//! [`ResponseSetter`](crate::server::ResponseSetter).
//!
//! ## Body Parsing
//!
//! | Content-Type contains | Result |
//! |---|---|
//! | `application/json` | [`RequestBody::Json`], or `None` when it does not parse |
//! | `application/x-www-form-urlencoded` | [`RequestBody::Form`] |
//! | `multipart/form-data` | [`RequestBody::Multipart`], untouched |
//! | anything else | [`RequestBody::Text`], or `None` for non UTF-8 |
//!
//! GET and HEAD requests never have a body.
//!
//! ## Correlation
//!
//! Building a context also yields a [`RequestScope`] carrying the request id
//! and start time. The dispatcher runs the whole chain inside that scope; see
//! [`scope`] for the accessors.

mod body;
mod core;
pub mod scope;

pub use body::{parse_body, MultipartBody, RequestBody};
pub use core::{parse_query, RawRequest, RequestContext};
pub use scope::RequestScope;
