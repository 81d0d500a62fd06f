use corridor::context::{scope, RawRequest, RequestBody, RequestContext};
use corridor::cookies::CookieOptions;
use corridor::dispatcher::{handler_fn, sync_handler};
use corridor::ids::RequestId;
use corridor::runtime_config::RuntimeConfig;
use corridor::{Reply, Router};
use http::{Method, Request};
use serde_json::json;

mod common;
use common::{body_json, body_text, get, header};

fn raw(method: Method, uri: &str, content_type: &str, body: &[u8]) -> RawRequest {
    RawRequest::new(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", content_type)
            .body(body.to_vec())
            .unwrap(),
    )
}

#[test]
fn test_form_body_is_decoded() {
    let (ctx, _) = RequestContext::build(
        raw(
            Method::POST,
            "/login",
            "application/x-www-form-urlencoded",
            b"user=ann+lee&pass=p%40ss",
        ),
        "x-request-id",
    );
    assert_eq!(ctx.body_value(), json!({ "user": "ann lee", "pass": "p@ss" }));
}

#[test]
fn test_multipart_body_is_kept_raw() {
    let (ctx, _) = RequestContext::build(
        raw(
            Method::POST,
            "/upload",
            "multipart/form-data; boundary=xyz",
            b"--xyz--",
        ),
        "x-request-id",
    );
    let Some(RequestBody::Multipart(multipart)) = &ctx.body else {
        panic!("expected multipart body, got {:?}", ctx.body);
    };
    assert_eq!(multipart.boundary(), Some("xyz"));
    assert_eq!(multipart.data, b"--xyz--");
}

#[test]
fn test_other_content_types_are_text() {
    let (ctx, _) = RequestContext::build(
        raw(Method::PUT, "/note", "text/markdown", b"# title"),
        "x-request-id",
    );
    assert_eq!(ctx.body, Some(RequestBody::Text("# title".to_string())));
}

#[test]
fn test_malformed_json_degrades_to_no_body() {
    let (ctx, _) = RequestContext::build(
        raw(Method::POST, "/echo", "application/json", b"{not json"),
        "x-request-id",
    );
    assert!(ctx.body.is_none());
    assert_eq!(ctx.body_value(), serde_json::Value::Null);
}

#[test]
fn test_get_body_is_ignored() {
    let (ctx, _) = RequestContext::build(
        raw(Method::GET, "/echo", "application/json", br#"{"a":1}"#),
        "x-request-id",
    );
    assert!(ctx.body.is_none());
}

#[test]
fn test_query_and_headers() {
    let request = Request::builder()
        .uri("/items?sort=asc&tag=a%20b&tag=c")
        .header("X-Tenant", "acme")
        .body(Vec::new())
        .unwrap();
    let (ctx, _) = RequestContext::build(RawRequest::new(request), "x-request-id");
    assert_eq!(ctx.query_param("sort"), Some("asc"));
    assert_eq!(ctx.query_param("tag"), Some("c"));
    assert_eq!(ctx.header("x-tenant"), Some("acme"));
    assert!(ctx.params().is_empty());
}

#[test]
fn test_inbound_request_id_is_reused() {
    let inbound = RequestId::new();
    let request = Request::builder()
        .uri("/")
        .header("x-correlation-id", inbound.to_string())
        .body(Vec::new())
        .unwrap();
    let (_, request_scope) = RequestContext::build(RawRequest::new(request), "x-correlation-id");
    assert_eq!(request_scope.request_id(), inbound);

    let request = Request::builder()
        .uri("/")
        .header("x-correlation-id", "not-a-ulid")
        .body(Vec::new())
        .unwrap();
    let (_, request_scope) = RequestContext::build(RawRequest::new(request), "x-correlation-id");
    assert_ne!(request_scope.request_id(), inbound);
}

#[tokio::test]
async fn test_scope_is_visible_inside_handler() {
    let inbound = RequestId::new();
    let config = RuntimeConfig {
        request_id_header: "x-trace".to_string(),
        ..RuntimeConfig::default()
    };
    let mut router = Router::with_config(config);
    router.get(
        "/whoami",
        handler_fn(|_ctx| {
            Box::pin(async move {
                scope::set_value("user", "ann");
                tokio::task::yield_now().await;
                Ok(Reply::Json(json!({
                    "request_id": scope::request_id().map(|id| id.to_string()),
                    "user": scope::value("user"),
                    "timed": scope::elapsed().is_some(),
                })))
            })
        }),
        vec![],
    );

    let request = Request::builder()
        .uri("/whoami")
        .header("x-trace", inbound.to_string())
        .body(Vec::new())
        .unwrap();
    let response = router.dispatch(request).await.unwrap();
    assert_eq!(
        body_json(&response),
        json!({ "request_id": inbound.to_string(), "user": "ann", "timed": true })
    );
    // the scope ends with the request
    assert!(scope::request_id().is_none());
}

#[tokio::test]
async fn test_cookies_round_trip_through_jar() {
    let mut router = Router::new();
    router.get(
        "/visit",
        sync_handler(|ctx| {
            let visits: u32 = ctx
                .cookies
                .get("visits")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            ctx.cookies.set(
                "visits",
                &(visits + 1).to_string(),
                CookieOptions {
                    path: Some("/".to_string()),
                    ..CookieOptions::default()
                },
            );
            ctx.cookies.delete("legacy", CookieOptions::default());
            assert_eq!(ctx.cookies.get("legacy"), None);
            Ok(Reply::text(visits.to_string()))
        }),
        vec![],
    );

    let request = Request::builder()
        .uri("/visit")
        .header("cookie", "visits=4; legacy=1")
        .body(Vec::new())
        .unwrap();
    let response = router.dispatch(request).await.unwrap();
    assert_eq!(body_text(&response), "4");
    assert_eq!(header(&response, "set-cookie"), Some("visits=5; Path=/"));
    assert_eq!(response.headers().get_all("set-cookie").iter().count(), 2);
}

#[tokio::test]
async fn test_context_without_route_params() {
    let mut router = Router::new();
    router.get(
        "/plain",
        sync_handler(|ctx| Ok(Reply::Json(json!(ctx.params().len())))),
        vec![],
    );
    let response = router.dispatch(get("/plain")).await.unwrap();
    assert_eq!(body_text(&response), "0");
}
