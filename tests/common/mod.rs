#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use corridor::dispatcher::Handler;
use corridor::middleware::{named, Middleware};
use corridor::Reply;
use http::{Method, Request, Response};
use serde_json::Value;

/// Route log output through the test harness writer.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("corridor=debug")
        .try_init();
}

pub fn request(method: Method, uri: &str) -> Request<Vec<u8>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Vec::new())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Vec<u8>> {
    request(Method::GET, uri)
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Vec<u8>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(serde_json::to_vec(body).unwrap())
        .unwrap()
}

pub fn header<'a>(response: &'a Response<Vec<u8>>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

pub fn body_text(response: &Response<Vec<u8>>) -> String {
    String::from_utf8(response.body().clone()).unwrap()
}

pub fn body_json(response: &Response<Vec<u8>>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

/// Shared log of middleware/handler steps, in execution order.
#[derive(Clone, Default)]
pub struct Trail(Arc<Mutex<Vec<String>>>);

impl Trail {
    pub fn push(&self, step: impl Into<String>) {
        self.0.lock().unwrap().push(step.into());
    }

    pub fn steps(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Middleware that records `<label>:before` and `<label>:after` around `next`.
    pub fn middleware(&self, label: &'static str) -> Arc<dyn Middleware> {
        let trail = self.clone();
        Arc::new(named(label, move |ctx, next| {
            let trail = trail.clone();
            Box::pin(async move {
                trail.push(format!("{label}:before"));
                next.run(ctx).await?;
                trail.push(format!("{label}:after"));
                Ok(Reply::Empty)
            })
        }))
    }

    /// Handler that records `handler` and replies with `body`.
    pub fn handler(&self, body: &'static str) -> impl Handler {
        let trail = self.clone();
        corridor::dispatcher::sync_handler(move |_ctx| {
            trail.push("handler");
            Ok(Reply::text(body))
        })
    }
}
