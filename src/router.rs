//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router is itself a
//! [`Handler`], so middleware wraps the whole application in one go:
//!
//! ```rust
//! use tollgate::middleware::{logging, recovery};
//! use tollgate::{Handler, Router};
//!
//! let app = Router::new()
//!     .with(logging::middleware(logging::Options::default()))
//!     .with(recovery::middleware(recovery::Options::default()));
//! ```

use std::collections::HashMap;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::request::Request;
use crate::response::ResponseWriter;

/// The application router.
///
/// Build it once at startup; pass it (or a middleware stack around it) to
/// [`Server::serve`](crate::Server::serve). Each registration returns `self`
/// so calls chain naturally. Unmatched requests get `404 Not Found`.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.boxed())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(&BoxedHandler, HashMap<String, String>)> {
        let matched = self.routes.get(method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

impl Handler for Router {
    fn serve<'a>(&'a self, mut req: Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            let Some((handler, params)) = self.lookup(req.method(), req.uri().path()) else {
                res.set_status(StatusCode::NOT_FOUND);
                return;
            };
            req.set_params(params);
            handler.serve(req, res).await;
        })
    }
}
