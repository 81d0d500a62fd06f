use http::Method;

use super::matcher::path_to_regex;
use super::{PathPattern, RouteEntry, RouteMethod, Router};
use crate::dispatcher::sync_handler;
use crate::reply::Reply;

fn text(body: &'static str) -> impl crate::dispatcher::Handler {
    sync_handler(move |_ctx| Ok(Reply::text(body)))
}

#[test]
fn test_root_path() {
    let (re, params) = path_to_regex("/");
    assert_eq!(re, "^/$");
    assert!(params.is_empty());
}

#[test]
fn test_parameterized_path() {
    let (re, params) = path_to_regex("/items/:id");
    assert_eq!(re, "^/items/([^/]+)$");
    assert_eq!(params, vec!["id"]);
}

#[test]
fn test_wildcard_path() {
    let (re, params) = path_to_regex("/api/*");
    assert_eq!(re, "^/api/(.*)$");
    assert_eq!(params, vec!["*"]);
}

#[test]
fn test_literals_are_escaped() {
    let pattern = PathPattern::compile("/files/:name.json").unwrap();
    assert_eq!(pattern.param_names(), ["name"]);
    assert!(pattern.is_match("/files/report.json"));
    assert!(!pattern.is_match("/files/reportxjson"));
}

#[test]
fn test_colon_without_name_is_literal() {
    let pattern = PathPattern::compile("/time/12:/x").unwrap();
    assert!(pattern.param_names().is_empty());
    assert!(pattern.is_match("/time/12:/x"));
}

#[test]
fn test_captures_are_percent_decoded() {
    let pattern = PathPattern::compile("/users/:name").unwrap();
    let params = pattern.captures("/users/j%C3%BCrgen").unwrap();
    assert_eq!(params["name"], "jürgen");

    let params = pattern.captures("/users/%FF").unwrap();
    assert_eq!(params["name"], "%FF");
}

#[test]
fn test_param_does_not_cross_segments() {
    let pattern = PathPattern::compile("/users/:id").unwrap();
    assert!(pattern.captures("/users/1/posts").is_none());
    assert!(pattern.captures("/users/").is_none());
}

#[test]
fn test_multiple_params_and_wildcard() {
    let pattern = PathPattern::compile("/:org/files/*").unwrap();
    let params = pattern.captures("/acme/files/a/b/c.txt").unwrap();
    assert_eq!(params["org"], "acme");
    assert_eq!(params["*"], "a/b/c.txt");
}

#[test]
fn test_route_method_parse() {
    assert_eq!("get".parse::<RouteMethod>().unwrap(), RouteMethod::Get);
    assert_eq!("ALL".parse::<RouteMethod>().unwrap(), RouteMethod::All);
    assert!("TRACE".parse::<RouteMethod>().is_err());
    assert_eq!(RouteMethod::Delete.to_string(), "DELETE");
    assert_eq!(RouteMethod::All.to_method(), None);
}

#[test]
fn test_single_registration_compiles_to_single() {
    let mut router = Router::new();
    router.get("/only", text("a"), vec![]);
    let table = router.compile();
    let entry = table.get("/only").unwrap();
    assert!(matches!(entry, RouteEntry::Single(_)));
    // a single entry serves any method
    assert!(entry.handler_for(&Method::DELETE).is_some());
}

#[test]
fn test_multiple_methods_compile_to_per_method() {
    let mut router = Router::new();
    router.get("/items", text("list"), vec![]);
    router.post("/items", text("create"), vec![]);
    let table = router.compile();
    let RouteEntry::PerMethod(handlers) = table.get("/items").unwrap() else {
        panic!("expected per-method entry");
    };
    assert_eq!(handlers.len(), 2);
    assert_eq!(handlers[&Method::GET].method(), RouteMethod::Get);
    assert_eq!(handlers[&Method::POST].method(), RouteMethod::Post);
}

#[test]
fn test_all_fills_every_method_slot() {
    let mut router = Router::new();
    router.all("/any", text("any"), vec![]);
    router.get("/any", text("get"), vec![]);
    let table = router.compile();
    let RouteEntry::PerMethod(handlers) = table.get("/any").unwrap() else {
        panic!("expected per-method entry");
    };
    assert_eq!(handlers.len(), RouteMethod::CONCRETE.len());
    assert_eq!(handlers[&Method::GET].method(), RouteMethod::Get);
    assert_eq!(handlers[&Method::HEAD].method(), RouteMethod::All);
}

#[test]
fn test_reregister_replaces_in_place() {
    let mut router = Router::new();
    router.get("/a", text("first"), vec![]);
    router.get("/b", text("b"), vec![]);
    router.get("/a", text("second"), vec![]);
    assert_eq!(router.routes().len(), 2);
    assert_eq!(router.compile().paths(), vec!["/a", "/b"]);
}

#[test]
fn test_find_uses_registration_order() {
    let mut router = Router::new();
    router.get("/api/*", text("wild"), vec![]);
    router.get("/api/users", text("exact"), vec![]);
    let table = router.compile();
    let m = table.find(&Method::GET, "/api/users").unwrap();
    assert_eq!(m.path_pattern, "/api/*");
    assert_eq!(m.params["*"], "users");
}

#[test]
fn test_find_method_mismatch_is_not_found() {
    let mut router = Router::new();
    router.get("/x", text("get"), vec![]);
    router.post("/x", text("post"), vec![]);
    router.all("/*", text("fallback"), vec![]);
    let table = router.compile();
    assert!(table.find(&Method::PUT, "/x").is_none());
    assert!(table.find(&Method::PUT, "/y").is_some());
}

#[test]
fn test_mount_prefixes_paths_and_merges_globals() {
    let mut sub = Router::new();
    sub.get("/users", text("users"), vec![]);
    sub.add_middleware(std::sync::Arc::new(crate::middleware::Recover));

    let mut router = Router::new();
    router.get("/health", text("ok"), vec![]);
    router.mount("/api", &sub);

    assert_eq!(router.compile().paths(), vec!["/health", "/api/users"]);
    assert_eq!(router.middlewares().len(), 1);
}

#[test]
fn test_compile_is_repeatable() {
    let mut router = Router::new();
    router.get("/a", text("a"), vec![]);
    let first = router.compile();
    router.get("/b", text("b"), vec![]);
    let second = router.compile();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 2);
}
