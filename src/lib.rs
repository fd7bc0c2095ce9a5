//! # tollgate
//!
//! Request logging and panic recovery middleware, plus the minimal HTTP
//! pipeline they plug into.
//!
//! ## The contract
//!
//! A [`Handler`] serves a request by writing to a [`ResponseWriter`]. A
//! middleware is a `Fn(BoxedHandler) -> BoxedHandler`: it gets the next
//! handler once and returns one that wraps it. Both built-in middlewares are
//! built from an immutable options value:
//!
//! - [`middleware::logging`] writes a `# Request` block before the handler
//!   runs and a `# Response` block after it returns. Every field is opt-in.
//! - [`middleware::recovery`] catches a handler panic and answers `500` with
//!   `recovered from panic: …` instead of dropping the connection.
//!
//! The rest of the crate is the pipeline: a radix-tree [`Router`] (itself a
//! handler) and a hyper-based [`Server`] with graceful shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tollgate::middleware::{logging, recovery};
//! use tollgate::{handler_fn, Handler, ResponseWriter, Router, Server, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tollgate::Error> {
//!     let app = Router::new()
//!         .get("/hello", handler_fn(|_req, res| Box::pin(async move {
//!             res.set_status(StatusCode::OK);
//!             let _ = res.write(b"hello");
//!         })))
//!         .with(logging::middleware(logging::Options::builder().all().build()))
//!         .with(recovery::middleware(recovery::Options::default()));
//!
//!     Server::bind(([0, 0, 0, 0], 3000).into()).serve(app).await
//! }
//! ```

mod body;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use body::Body;
pub use error::{BoxError, Error, Recovered};
pub use handler::{handler_fn, BoxFuture, BoxedHandler, FnHandler, Handler};
pub use http::{Method, StatusCode};
pub use request::Request;
pub use response::{write_error, ContentType, Response, ResponseWriter};
pub use router::Router;
pub use server::Server;
