use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use crate::context::RequestContext;
use crate::middleware::Middleware;
use crate::reply::Reply;

/// Terminal step of a chain.
pub trait Handler: Send + Sync {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, anyhow::Result<Reply>>;
}

/// Async closure handler, see [`handler_fn`].
pub struct FnHandler<F>(F);

/// Wrap an async closure as a [`Handler`].
///
/// ```rust
/// use corridor::dispatcher::handler_fn;
/// use corridor::Reply;
/// use serde_json::json;
///
/// let get_user = handler_fn(|ctx| {
///     Box::pin(async move { Ok(Reply::from(json!({ "id": ctx.param("id") }))) })
/// });
/// ```
pub fn handler_fn<F>(func: F) -> FnHandler<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, anyhow::Result<Reply>> + Send + Sync,
{
    FnHandler(func)
}

impl<F> Handler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, anyhow::Result<Reply>> + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, anyhow::Result<Reply>> {
        (self.0)(ctx)
    }
}

/// Synchronous closure handler, see [`sync_handler`].
pub struct SyncHandler<F>(F);

/// Wrap a synchronous closure as a [`Handler`].
pub fn sync_handler<F>(func: F) -> SyncHandler<F>
where
    F: Fn(&mut RequestContext) -> anyhow::Result<Reply> + Send + Sync,
{
    SyncHandler(func)
}

impl<F> Handler for SyncHandler<F>
where
    F: Fn(&mut RequestContext) -> anyhow::Result<Reply> + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, anyhow::Result<Reply>> {
        let result = (self.0)(ctx);
        Box::pin(async move { result })
    }
}

/// Global middleware, then route middleware, then the handler.
pub struct Chain {
    middlewares: Vec<Arc<dyn Middleware>>,
    handler: Arc<dyn Handler>,
}

/// Continuation handed to a middleware: a cursor into its chain.
///
/// Consumed by [`Next::run`], so a middleware can advance the chain at most
/// once. Dropping it without running short-circuits everything downstream.
pub struct Next<'a> {
    chain: &'a Chain,
    cursor: usize,
}

impl<'a> Next<'a> {
    /// Run the rest of the chain against `ctx`.
    ///
    /// Errors from downstream are returned untouched; a middleware that wants
    /// to recover inspects this result.
    pub fn run<'b>(self, ctx: &'b mut RequestContext) -> BoxFuture<'b, anyhow::Result<()>>
    where
        'a: 'b,
    {
        advance(self.chain, self.cursor, ctx)
    }

    /// Steps left after this point, the handler included.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chain.middlewares.len() + 1 - self.cursor
    }
}

fn advance<'a>(
    chain: &'a Chain,
    cursor: usize,
    ctx: &'a mut RequestContext,
) -> BoxFuture<'a, anyhow::Result<()>> {
    Box::pin(async move {
        match chain.middlewares.get(cursor) {
            Some(middleware) => {
                debug!(
                    middleware_idx = cursor,
                    middleware_name = %middleware.name(),
                    "Middleware step"
                );
                let next = Next {
                    chain,
                    cursor: cursor + 1,
                };
                let reply = middleware.handle(ctx, next).await?;
                if !reply.is_empty() {
                    ctx.outcome = reply;
                }
            }
            None => {
                debug!(middleware_count = chain.middlewares.len(), "Handler step");
                let reply = chain.handler.call(ctx).await?;
                ctx.outcome = reply;
            }
        }
        Ok(())
    })
}

impl Chain {
    #[must_use]
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>, handler: Arc<dyn Handler>) -> Self {
        Self {
            middlewares,
            handler,
        }
    }

    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Execute the chain once and return the pipeline result.
    ///
    /// The engine installs no error handling of its own: the first `Err`
    /// from any step propagates out unless an upstream middleware absorbs it.
    pub async fn run(&self, ctx: &mut RequestContext) -> anyhow::Result<Reply> {
        ctx.outcome = Reply::Empty;
        advance(self, 0, ctx).await?;
        Ok(std::mem::take(&mut ctx.outcome))
    }
}
