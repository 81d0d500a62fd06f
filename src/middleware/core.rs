use futures::future::BoxFuture;

use crate::context::RequestContext;
use crate::dispatcher::Next;
use crate::reply::Reply;

/// One step of a request chain.
///
/// A middleware receives the shared context and a continuation. It may work
/// on the context, run the continuation (at most once, [`Next::run`] consumes
/// it), work on the context again, and return a reply. Returning
/// [`Reply::Empty`] leaves the pipeline result alone; anything else replaces it.
pub trait Middleware: Send + Sync {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, anyhow::Result<Reply>>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Closure middleware, see [`from_fn`].
pub struct FnMiddleware<F> {
    name: String,
    func: F,
}

/// Wrap an async closure as a [`Middleware`].
///
/// ```rust
/// use corridor::middleware::from_fn;
/// use corridor::Reply;
///
/// let deny_all = from_fn(|ctx, _next| {
///     Box::pin(async move {
///         ctx.set.status = 403;
///         Ok(Reply::text("forbidden"))
///     })
/// });
/// ```
pub fn from_fn<F>(func: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Next<'a>) -> BoxFuture<'a, anyhow::Result<Reply>>
        + Send
        + Sync,
{
    named("fn_middleware", func)
}

/// Like [`from_fn`], with a name for logs.
pub fn named<F>(name: impl Into<String>, func: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Next<'a>) -> BoxFuture<'a, anyhow::Result<Reply>>
        + Send
        + Sync,
{
    FnMiddleware {
        name: name.into(),
        func,
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Next<'a>) -> BoxFuture<'a, anyhow::Result<Reply>>
        + Send
        + Sync,
{
    fn handle<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, anyhow::Result<Reply>> {
        (self.func)(ctx, next)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
