use std::collections::HashMap;

use http::Method;
use serde_json::{Map, Value};
use tracing::debug;

/// Parsed request body, selected by the request's `Content-Type`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(HashMap<String, String>),
    /// Multipart payloads are not decoded; the raw body travels with its content type.
    Multipart(MultipartBody),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MultipartBody {
    /// The `boundary` parameter of the content type, if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.content_type.split(';').find_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            key.eq_ignore_ascii_case("boundary")
                .then(|| value.trim_matches('"'))
        })
    }
}

impl RequestBody {
    /// JSON view of the body. Multipart bodies have no JSON form and map to null.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            RequestBody::Json(value) => value.clone(),
            RequestBody::Form(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect::<Map<String, Value>>(),
            ),
            RequestBody::Multipart(_) => Value::Null,
            RequestBody::Text(text) => Value::String(text.clone()),
        }
    }
}

/// Parse a request body.
///
/// GET and HEAD never carry a body. Parse failures yield `None` rather than an
/// error; handlers check for presence themselves.
#[must_use]
pub fn parse_body(
    method: &Method,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Option<RequestBody> {
    if method == Method::GET || method == Method::HEAD {
        return None;
    }
    let content_type = content_type.unwrap_or("");
    let lowered = content_type.to_ascii_lowercase();

    if lowered.contains("application/json") {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Some(RequestBody::Json(value)),
            Err(e) => {
                debug!(error = %e, body_size_bytes = bytes.len(), "JSON body parse failed");
                None
            }
        }
    } else if lowered.contains("application/x-www-form-urlencoded") {
        let fields = url::form_urlencoded::parse(bytes)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Some(RequestBody::Form(fields))
    } else if lowered.contains("multipart/form-data") {
        Some(RequestBody::Multipart(MultipartBody {
            content_type: content_type.to_string(),
            data: bytes.to_vec(),
        }))
    } else {
        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => Some(RequestBody::Text(text)),
            Err(e) => {
                debug!(error = %e, "Text body is not UTF-8");
                None
            }
        }
    }
}
