use futures::future::BoxFuture;
use http::Method;

use super::Middleware;
use crate::context::RequestContext;
use crate::dispatcher::Next;
use crate::reply::Reply;
use crate::server::ResponseSetter;

/// CORS (Cross-Origin Resource Sharing) middleware
///
/// Preflight `OPTIONS` requests are answered with 204 and never reach the
/// route handler. Other requests run the chain and receive the CORS headers
/// afterwards.
pub struct CorsMiddleware {
    allowed_origins: Vec<String>,
    allowed_headers: Vec<String>,
    allowed_methods: Vec<Method>,
}

impl CorsMiddleware {
    /// # Arguments
    ///
    /// * `allowed_origins` - origins to accept, `"*"` for any
    /// * `allowed_headers` - request headers the browser may send
    /// * `allowed_methods` - methods advertised on preflight
    #[must_use]
    pub fn new(
        allowed_origins: Vec<String>,
        allowed_headers: Vec<String>,
        allowed_methods: Vec<Method>,
    ) -> Self {
        Self {
            allowed_origins,
            allowed_headers,
            allowed_methods,
        }
    }

    /// Value for `Access-Control-Allow-Origin`, or `None` when the origin is not allowed.
    fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        if self.allowed_origins.iter().any(|o| o == "*") {
            return Some("*".to_string());
        }
        let origin = origin?;
        self.allowed_origins
            .iter()
            .find(|o| o.eq_ignore_ascii_case(origin))
            .map(|_| origin.to_string())
    }

    fn apply(&self, set: &mut ResponseSetter, origin: Option<&str>) {
        let Some(allow) = self.allow_origin(origin) else {
            return;
        };
        if allow != "*" {
            set.header("Vary", "Origin");
        }
        set.header("Access-Control-Allow-Origin", allow);
        set.header("Access-Control-Allow-Headers", self.allowed_headers.join(", "));
        let methods = self
            .allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        set.header("Access-Control-Allow-Methods", methods);
    }
}

/// Permissive policy for development: any origin, common methods.
impl Default for CorsMiddleware {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".into()],
            allowed_headers: vec!["Content-Type".into(), "Authorization".into()],
            allowed_methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ],
        }
    }
}

impl Middleware for CorsMiddleware {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, anyhow::Result<Reply>> {
        Box::pin(async move {
            let origin = ctx.header("origin").map(str::to_string);
            if ctx.request.method() == Method::OPTIONS {
                ctx.set.status = 204;
                self.apply(&mut ctx.set, origin.as_deref());
                return Ok(Reply::Empty);
            }
            next.run(ctx).await?;
            self.apply(&mut ctx.set, origin.as_deref());
            Ok(Reply::Empty)
        })
    }

    fn name(&self) -> &str {
        "cors"
    }
}
