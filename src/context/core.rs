use std::collections::HashMap;

use http::Request;
use serde_json::Value;
use tracing::debug;

use super::body::{parse_body, RequestBody};
use super::scope::RequestScope;
use crate::cookies::CookieJar;
use crate::ids::RequestId;
use crate::reply::Reply;
use crate::server::ResponseSetter;

/// An inbound request together with the path parameters extracted by
/// whichever matcher located its route (host listener or fallback matcher).
#[derive(Debug)]
pub struct RawRequest {
    pub request: Request<Vec<u8>>,
    pub params: HashMap<String, String>,
}

impl RawRequest {
    #[must_use]
    pub fn new(request: Request<Vec<u8>>) -> Self {
        Self {
            request,
            params: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_params(request: Request<Vec<u8>>, params: HashMap<String, String>) -> Self {
        Self { request, params }
    }
}

/// Per-request bundle handed by reference to every middleware and the handler.
///
/// Inputs (`params`, `query`, `body`) are fixed at construction; `set` is the
/// mutable response configuration that drives the final response.
#[derive(Debug)]
pub struct RequestContext {
    pub request: Request<Vec<u8>>,
    params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Option<RequestBody>,
    pub cookies: CookieJar,
    pub set: ResponseSetter,
    pub(crate) outcome: Reply,
}

/// Parse the query component of a URI. Duplicate keys keep the last value.
#[must_use]
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

impl RequestContext {
    /// Build the context and the correlation scope for one request.
    ///
    /// `request_id_header` names the inbound header that may carry an existing
    /// correlation id.
    #[must_use]
    pub fn build(raw: RawRequest, request_id_header: &str) -> (Self, RequestScope) {
        let RawRequest { request, params } = raw;

        let query = parse_query(request.uri().query());
        let content_type = request
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let body = parse_body(request.method(), content_type, request.body());
        let cookies = CookieJar::from_headers(request.headers());

        let request_id = RequestId::from_header_or_new(
            request
                .headers()
                .get(request_id_header)
                .and_then(|v| v.to_str().ok()),
        );

        debug!(
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
            param_count = params.len(),
            query_count = query.len(),
            has_body = body.is_some(),
            "Request context built"
        );

        let ctx = RequestContext {
            request,
            params,
            query,
            body,
            cookies,
            set: ResponseSetter::default(),
            outcome: Reply::Empty,
        };
        (ctx, RequestScope::new(request_id))
    }

    /// Path parameters of the route pattern that matched this request.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Case-insensitive header lookup on the inbound request.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// JSON view of the body; `null` when absent.
    #[must_use]
    pub fn body_value(&self) -> Value {
        self.body.as_ref().map_or(Value::Null, RequestBody::to_value)
    }

    /// The pipeline result recorded so far.
    #[must_use]
    pub fn outcome(&self) -> &Reply {
        &self.outcome
    }
}
