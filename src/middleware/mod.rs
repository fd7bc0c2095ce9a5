//! Middleware layer.
//!
//! A middleware is a function from handler to handler:
//! `Fn(BoxedHandler) -> BoxedHandler`. It receives the next handler once, at
//! composition time, and returns a handler that runs around it on every
//! request. Compose with [`Handler::with`](crate::Handler::with); the last
//! layer added runs first.
//!
//! Built-in middleware:
//! - [`logging`]: renders request and response summaries to a log sink
//! - [`recovery`]: turns handler panics into `500` responses
//!
//! [`capture`] holds the writer adapter `logging` observes responses with; it
//! is public for custom middleware that needs the same view.

pub mod capture;
pub mod logging;
pub mod recovery;
