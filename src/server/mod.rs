//! # Server Module
//!
//! The response side of dispatch: [`ResponseSetter`] (the mutable response
//! configuration every middleware sees), [`build_response`] which renders the
//! pipeline result into an `http::Response`, and [`serve`], the outermost
//! caller that converts escaped errors into a generic 500.
//!
//! ## Content Resolution
//!
//! | `Content` | `Content-Type` | Body |
//! |---|---|---|
//! | `Json` | `application/json` | JSON serialization |
//! | `Text` / `Html` / `Xml` | `text/plain` / `text/html` / `application/xml` | string coercion |
//! | `Image(kind)` | `image/<kind>` | base64-decoded string, or bytes |
//! | `Csv { filename }` | `text/csv` + attachment disposition | string coercion |
//! | `Auto` | `text/plain` for scalars, `application/json` for objects and arrays | |
//!
//! A null or empty result always yields an empty body. A set `redirect`
//! short-circuits content resolution entirely.

pub mod response;
pub mod service;

pub use response::{
    build_response, cache_control, max_age_seconds, sanitize_filename, Content, ImageKind,
    ResponseSetter,
};
pub use service::{internal_error, not_found, serve};
