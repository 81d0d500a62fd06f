use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use http::{Method, Request, Response};
use tracing::{debug, info, warn};

use super::core::RouteMethod;
use super::matcher::PathPattern;
use crate::context::{scope, RawRequest, RequestContext};
use crate::dispatcher::Chain;
use crate::server::{build_response, not_found};

/// A route's complete request pipeline: context construction, the
/// middleware chain and response building. This is the callable a host
/// listener invokes once it has matched a request.
#[derive(Clone)]
pub struct RouteHandler {
    method: RouteMethod,
    path: Arc<str>,
    chain: Arc<Chain>,
    request_id_header: Arc<str>,
}

impl std::fmt::Debug for RouteHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteHandler")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("middleware_count", &self.chain.middleware_count())
            .finish()
    }
}

impl RouteHandler {
    pub(crate) fn new(
        method: RouteMethod,
        path: &str,
        chain: Chain,
        request_id_header: &str,
    ) -> Self {
        Self {
            method,
            path: Arc::from(path),
            chain: Arc::new(chain),
            request_id_header: Arc::from(request_id_header),
        }
    }

    /// The method this handler was registered under (`All` for catch-all registrations).
    #[must_use]
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run the pipeline for one request.
    ///
    /// The chain executes inside the request's correlation scope. Errors the
    /// chain does not absorb are returned as-is.
    pub async fn call(&self, raw: RawRequest) -> anyhow::Result<Response<Vec<u8>>> {
        let (mut ctx, request_scope) = RequestContext::build(raw, &self.request_id_header);
        let chain = Arc::clone(&self.chain);
        scope::run(request_scope, async move {
            let result = chain.run(&mut ctx).await?;
            build_response(&result, &ctx.set, &ctx.cookies)
        })
        .await
    }
}

/// Compiled form of all registrations for one path.
#[derive(Debug, Clone)]
pub enum RouteEntry {
    /// Exactly one registration exists for the path; it serves every method.
    Single(RouteHandler),
    /// Several registrations, keyed by method.
    PerMethod(HashMap<Method, RouteHandler>),
}

impl RouteEntry {
    #[must_use]
    pub fn handler_for(&self, method: &Method) -> Option<&RouteHandler> {
        match self {
            RouteEntry::Single(handler) => Some(handler),
            RouteEntry::PerMethod(handlers) => handlers.get(method),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    path: String,
    entry: RouteEntry,
    pattern: Option<PathPattern>,
}

/// Path-keyed dispatch table, in first-registration order of each path.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

/// Result of the fallback matcher.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub path_pattern: &'a str,
    pub handler: &'a RouteHandler,
    pub params: HashMap<String, String>,
}

impl RouteTable {
    pub(crate) fn new(entries: Vec<(String, RouteEntry)>) -> Self {
        let routes = entries
            .into_iter()
            .map(|(path, entry)| {
                let pattern = match PathPattern::compile(&path) {
                    Ok(pattern) => Some(pattern),
                    Err(e) => {
                        warn!(
                            path = %path,
                            error = %e,
                            "Route pattern not usable by the fallback matcher"
                        );
                        None
                    }
                };
                CompiledRoute {
                    path,
                    entry,
                    pattern,
                }
            })
            .collect();
        Self { routes }
    }

    /// `(path, entry)` pairs in table order, for handing to a host listener.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
        self.routes.iter().map(|r| (r.path.as_str(), &r.entry))
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|r| r.path == path).map(|r| &r.entry)
    }

    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.path.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Fallback matcher: the first path pattern (in table order) matching
    /// `path` decides. If that entry has no handler for `method`, the request
    /// is not found; later entries are not consulted.
    ///
    /// Table order is registration order, not specificity. A host listener
    /// that ranks exact paths above parameters above wildcards can pick a
    /// different route for overlapping patterns.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        debug!(method = %method, path = %path, "Route match attempt");
        let match_start = Instant::now();

        for route in &self.routes {
            let Some(pattern) = &route.pattern else {
                continue;
            };
            let Some(params) = pattern.captures(path) else {
                continue;
            };
            let Some(handler) = route.entry.handler_for(method) else {
                warn!(
                    method = %method,
                    path = %path,
                    route_pattern = %route.path,
                    "Path matched but method is not registered"
                );
                return None;
            };
            info!(
                method = %method,
                path = %path,
                route_pattern = %route.path,
                path_params = ?params,
                duration_us = match_start.elapsed().as_micros(),
                "Route matched"
            );
            return Some(RouteMatch {
                path_pattern: &route.path,
                handler,
                params,
            });
        }

        warn!(
            method = %method,
            path = %path,
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        None
    }

    /// Match and run a single request; unmatched requests get a 404.
    pub async fn dispatch(&self, request: Request<Vec<u8>>) -> anyhow::Result<Response<Vec<u8>>> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        match self.find(&method, &path) {
            Some(RouteMatch {
                handler, params, ..
            }) => handler.call(RawRequest::with_params(request, params)).await,
            None => Ok(not_found()),
        }
    }
}
