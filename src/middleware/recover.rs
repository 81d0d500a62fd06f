use futures::future::BoxFuture;
use serde_json::json;
use tracing::error;

use super::Middleware;
use crate::context::{scope, RequestContext};
use crate::dispatcher::Next;
use crate::reply::Reply;
use crate::server::Content;

/// Error-handling middleware.
///
/// Register it first so its `next` covers the whole chain. An error from
/// anywhere downstream is logged and answered with status 500 and a generic
/// JSON body; the error text never reaches the client.
#[derive(Debug, Default, Clone, Copy)]
pub struct Recover;

impl Middleware for Recover {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, anyhow::Result<Reply>> {
        Box::pin(async move {
            match next.run(ctx).await {
                Ok(()) => Ok(Reply::Empty),
                Err(e) => {
                    let request_id = scope::request_id()
                        .map(|id| id.to_string())
                        .unwrap_or_default();
                    error!(
                        request_id = %request_id,
                        method = %ctx.request.method(),
                        path = %ctx.request.uri().path(),
                        error = %format!("{e:#}"),
                        "Request chain failed"
                    );
                    ctx.set.status = 500;
                    ctx.set.content = Content::Json;
                    ctx.set.redirect = None;
                    ctx.set.cache = None;
                    Ok(Reply::Json(json!({ "error": "Internal Server Error" })))
                }
            }
        })
    }

    fn name(&self) -> &str {
        "recover"
    }
}
