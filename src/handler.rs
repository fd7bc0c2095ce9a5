//! Handler trait, type erasure and composition.
//!
//! # How handlers are stored
//!
//! The router holds handlers of *different* types in one table, and a
//! middleware wraps whatever handler it is given. Both work with
//! [`BoxedHandler`], an `Arc<dyn Handler>`, so everything downstream of
//! registration is one concrete type.
//!
//! ```text
//! handler_fn(|req, res| Box::pin(async move { … }))   ← user writes this
//!        ↓ router.get("/", h)
//! Arc::new(FnHandler(closure))                        ← BoxedHandler
//!        ↓ logging::middleware(opts)(boxed)
//! Arc::new(Logging { next: boxed, … })                ← still a BoxedHandler
//!        ↓ at request time
//! handler.serve(req, &mut res)                        ← one vtable call per layer
//! ```
//!
//! A middleware is nothing more than a `Fn(BoxedHandler) -> BoxedHandler`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::ResponseWriter;

/// A heap-allocated, type-erased future borrowing the handler and the writer
/// for `'a`.
///
/// `Send` lets tokio move the future across worker threads.
pub type BoxFuture<'a, T = ()> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A heap-allocated, type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

/// Serves one request by writing to `res`.
///
/// Implement this directly for middleware structs; wrap plain closures with
/// [`handler_fn`].
pub trait Handler: Send + Sync + 'static {
    fn serve<'a>(&'a self, req: Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a>;

    /// Erases the handler's type.
    fn boxed(self) -> BoxedHandler
    where
        Self: Sized,
    {
        Arc::new(self)
    }

    /// Wraps this handler in `middleware`. Chained calls nest outwards: in
    /// `h.with(a).with(b)`, `b` sees the request first.
    fn with<M>(self, middleware: M) -> BoxedHandler
    where
        Self: Sized,
        M: FnOnce(BoxedHandler) -> BoxedHandler,
    {
        middleware(self.boxed())
    }
}

impl Handler for BoxedHandler {
    fn serve<'a>(&'a self, req: Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        (**self).serve(req, res)
    }

    fn boxed(self) -> BoxedHandler {
        self
    }
}

/// Turns a closure into a [`Handler`].
///
/// The closure returns a boxed future so it can borrow the writer:
///
/// ```rust
/// use tollgate::{handler_fn, ResponseWriter, StatusCode};
///
/// let hello = handler_fn(|_req, res| Box::pin(async move {
///     res.set_status(StatusCode::OK);
///     let _ = res.write(b"hello");
/// }));
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: for<'a> Fn(Request, &'a mut dyn ResponseWriter) -> BoxFuture<'a> + Send + Sync + 'static,
{
    FnHandler(f)
}

/// Newtype returned by [`handler_fn`].
pub struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: for<'a> Fn(Request, &'a mut dyn ResponseWriter) -> BoxFuture<'a> + Send + Sync + 'static,
{
    fn serve<'a>(&'a self, req: Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        (self.0)(req, res)
    }
}
