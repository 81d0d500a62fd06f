use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use http::{Method, Request, Response};
use tracing::{debug, info, warn};

use super::table::{RouteEntry, RouteHandler, RouteTable};
use crate::dispatcher::{Chain, Handler};
use crate::middleware::Middleware;
use crate::runtime_config::RuntimeConfig;

/// Method a route is registered under. `All` serves every concrete method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    All,
}

impl RouteMethod {
    /// The methods an `All` registration expands to.
    pub const CONCRETE: [RouteMethod; 7] = [
        RouteMethod::Get,
        RouteMethod::Post,
        RouteMethod::Put,
        RouteMethod::Patch,
        RouteMethod::Delete,
        RouteMethod::Options,
        RouteMethod::Head,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Delete => "DELETE",
            RouteMethod::Options => "OPTIONS",
            RouteMethod::Head => "HEAD",
            RouteMethod::All => "ALL",
        }
    }

    /// The `http::Method` for a concrete method, `None` for `All`.
    #[must_use]
    pub fn to_method(self) -> Option<Method> {
        match self {
            RouteMethod::Get => Some(Method::GET),
            RouteMethod::Post => Some(Method::POST),
            RouteMethod::Put => Some(Method::PUT),
            RouteMethod::Patch => Some(Method::PATCH),
            RouteMethod::Delete => Some(Method::DELETE),
            RouteMethod::Options => Some(Method::OPTIONS),
            RouteMethod::Head => Some(Method::HEAD),
            RouteMethod::All => None,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(RouteMethod::Get),
            "POST" => Ok(RouteMethod::Post),
            "PUT" => Ok(RouteMethod::Put),
            "PATCH" => Ok(RouteMethod::Patch),
            "DELETE" => Ok(RouteMethod::Delete),
            "OPTIONS" => Ok(RouteMethod::Options),
            "HEAD" => Ok(RouteMethod::Head),
            "ALL" | "*" => Ok(RouteMethod::All),
            other => Err(anyhow::anyhow!("unsupported route method: {other}")),
        }
    }
}

/// One `(method, path)` registration.
#[derive(Clone)]
pub struct RouteRegistration {
    pub method: RouteMethod,
    pub path: String,
    pub handler: Arc<dyn Handler>,
    /// Route-specific middleware, run after the router's global middleware.
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl fmt::Debug for RouteRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.middlewares.iter().map(|m| m.name()).collect();
        f.debug_struct("RouteRegistration")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("middlewares", &names)
            .finish()
    }
}

/// Route registry.
///
/// Collects registrations and global middleware, and compiles them into a
/// [`RouteTable`] on demand. Compilation has no side effects, so it can be
/// repeated after further registrations.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<RouteRegistration>,
    middlewares: Vec<Arc<dyn Middleware>>,
    config: RuntimeConfig,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.middlewares.iter().map(|m| m.name()).collect();
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("middlewares", &names)
            .field("config", &self.config)
            .finish()
    }
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Register `handler` for `(method, path)`.
    ///
    /// An existing registration for the same pair is replaced in place, so
    /// the path keeps its position in the compiled table.
    pub fn register(
        &mut self,
        method: RouteMethod,
        path: impl Into<String>,
        handler: impl Handler + 'static,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> &mut Self {
        self.insert(RouteRegistration {
            method,
            path: path.into(),
            handler: Arc::new(handler),
            middlewares,
        });
        self
    }

    fn insert(&mut self, registration: RouteRegistration) {
        let existing = self
            .routes
            .iter_mut()
            .find(|r| r.method == registration.method && r.path == registration.path);
        match existing {
            Some(slot) => {
                warn!(
                    method = %registration.method,
                    path = %registration.path,
                    "Route re-registered, replacing previous handler"
                );
                *slot = registration;
            }
            None => {
                debug!(
                    method = %registration.method,
                    path = %registration.path,
                    middleware_count = registration.middlewares.len(),
                    "Route registered"
                );
                self.routes.push(registration);
            }
        }
    }

    pub fn get(
        &mut self,
        path: impl Into<String>,
        handler: impl Handler + 'static,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> &mut Self {
        self.register(RouteMethod::Get, path, handler, middlewares)
    }

    pub fn post(
        &mut self,
        path: impl Into<String>,
        handler: impl Handler + 'static,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> &mut Self {
        self.register(RouteMethod::Post, path, handler, middlewares)
    }

    pub fn put(
        &mut self,
        path: impl Into<String>,
        handler: impl Handler + 'static,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> &mut Self {
        self.register(RouteMethod::Put, path, handler, middlewares)
    }

    pub fn patch(
        &mut self,
        path: impl Into<String>,
        handler: impl Handler + 'static,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> &mut Self {
        self.register(RouteMethod::Patch, path, handler, middlewares)
    }

    pub fn delete(
        &mut self,
        path: impl Into<String>,
        handler: impl Handler + 'static,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> &mut Self {
        self.register(RouteMethod::Delete, path, handler, middlewares)
    }

    pub fn options(
        &mut self,
        path: impl Into<String>,
        handler: impl Handler + 'static,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> &mut Self {
        self.register(RouteMethod::Options, path, handler, middlewares)
    }

    pub fn head(
        &mut self,
        path: impl Into<String>,
        handler: impl Handler + 'static,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> &mut Self {
        self.register(RouteMethod::Head, path, handler, middlewares)
    }

    pub fn all(
        &mut self,
        path: impl Into<String>,
        handler: impl Handler + 'static,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> &mut Self {
        self.register(RouteMethod::All, path, handler, middlewares)
    }

    /// Append a global middleware. Globals run before route middleware, in
    /// the order they were added.
    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        debug!(middleware = middleware.name(), "Global middleware added");
        self.middlewares.push(middleware);
        self
    }

    /// Re-register every route of `sub` under `prefix`.
    ///
    /// The prefix is concatenated as-is (`"/api"` + `"/users"`), so callers
    /// must avoid doubled slashes. The sub-router's global middleware is
    /// appended to this router's global list and therefore applies to every
    /// route, not just the mounted ones.
    pub fn mount(&mut self, prefix: &str, sub: &Router) -> &mut Self {
        for registration in &sub.routes {
            let mut registration = registration.clone();
            registration.path = format!("{prefix}{}", registration.path);
            self.insert(registration);
        }
        self.middlewares.extend(sub.middlewares.iter().map(Arc::clone));
        info!(
            prefix = %prefix,
            routes_count = sub.routes.len(),
            middleware_count = sub.middlewares.len(),
            "Sub-router mounted"
        );
        self
    }

    /// Registrations in registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteRegistration] {
        &self.routes
    }

    #[must_use]
    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    fn wrap(&self, registration: &RouteRegistration) -> RouteHandler {
        let middlewares = self
            .middlewares
            .iter()
            .chain(registration.middlewares.iter())
            .map(Arc::clone)
            .collect();
        let chain = Chain::new(middlewares, Arc::clone(&registration.handler));
        RouteHandler::new(
            registration.method,
            &registration.path,
            chain,
            &self.config.request_id_header,
        )
    }

    /// Build the compiled route table.
    ///
    /// A path with a single registration compiles to [`RouteEntry::Single`],
    /// which serves any method. Several registrations compile to
    /// [`RouteEntry::PerMethod`]; an `All` registration fills every method
    /// slot, and later registrations overwrite earlier slots.
    #[must_use]
    pub fn compile(&self) -> RouteTable {
        let mut order: Vec<&str> = Vec::new();
        let mut grouped: HashMap<&str, Vec<&RouteRegistration>> = HashMap::new();
        for registration in &self.routes {
            let group = grouped.entry(registration.path.as_str()).or_default();
            if group.is_empty() {
                order.push(registration.path.as_str());
            }
            group.push(registration);
        }

        let entries: Vec<(String, RouteEntry)> = order
            .into_iter()
            .filter_map(|path| {
                let registrations = grouped.remove(path)?;
                let entry = match registrations.as_slice() {
                    [only] => RouteEntry::Single(self.wrap(only)),
                    many => {
                        let mut by_method = HashMap::new();
                        for registration in many {
                            let handler = self.wrap(registration);
                            match registration.method.to_method() {
                                Some(method) => {
                                    by_method.insert(method, handler);
                                }
                                None => {
                                    for method in
                                        RouteMethod::CONCRETE.iter().filter_map(|m| m.to_method())
                                    {
                                        by_method.insert(method, handler.clone());
                                    }
                                }
                            }
                        }
                        RouteEntry::PerMethod(by_method)
                    }
                };
                Some((path.to_string(), entry))
            })
            .collect();

        debug!(
            routes_count = entries.len(),
            registrations_count = self.routes.len(),
            global_middleware_count = self.middlewares.len(),
            "Route table compiled"
        );
        RouteTable::new(entries)
    }

    /// Compile and dispatch a single request through the fallback matcher.
    ///
    /// Errors from the chain are returned unchanged; see
    /// [`crate::server::serve`] for the 500 conversion.
    pub async fn dispatch(&self, request: Request<Vec<u8>>) -> anyhow::Result<Response<Vec<u8>>> {
        self.compile().dispatch(request).await
    }

    /// Compile and serve a single request, converting escaped errors to a 500.
    pub async fn serve(&self, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        crate::server::serve(&self.compile(), request).await
    }
}
