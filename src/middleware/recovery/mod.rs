//! Panic recovery middleware.
//!
//! A panic inside a handler would otherwise unwind through hyper's connection
//! task and drop the connection without a response. This middleware catches
//! it at the layer boundary and answers `500 Internal Server Error` instead:
//!
//! ```text
//! recovered from panic: boom
//!
//! # Debug stack
//! panicked at src/routes.rs:12:5
//!    0: …
//! ```
//!
//! The stack section is only present with [`Setting::StackTrace`] enabled. It
//! starts with the panic location and is captured by a panic hook before
//! unwinding, so it still contains the panicking frame. Building a layer with
//! stack traces enabled installs that hook once per process, chained in front
//! of the existing one.
//!
//! The guard covers the whole downstream call. A handler that panics while
//! building its future, before anything is awaited, is recovered the same way.
//!
//! Only unwinding panics are caught. A request whose future is dropped
//! (client went away, timeout layer fired) is cancelled normally, and a
//! binary built with `panic = "abort"` still aborts.

mod options;
mod site;

use std::fmt::Write;
use std::panic::AssertUnwindSafe;

use futures::future::{self, FutureExt};
use http::StatusCode;
use tracing::{error, warn};

use crate::error::{Error, Recovered};
use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::request::Request;
use crate::response::{write_error, ResponseWriter};

pub use options::{Options, OptionsBuilder, Setting};

use site::{Armed, PanicSite};

/// Builds the recovery middleware.
///
/// ```rust
/// use tollgate::middleware::recovery::{self, Options};
/// use tollgate::{Handler, Router};
///
/// let app = Router::new().with(recovery::middleware(Options::builder().stack_trace(true).build()));
/// ```
pub fn middleware(options: Options) -> impl Fn(BoxedHandler) -> BoxedHandler + Clone + Send + Sync + 'static {
    if options.stack_trace() {
        site::install_hook();
    }
    move |next: BoxedHandler| Recovery { next, options }.boxed()
}

struct Recovery {
    next: BoxedHandler,
    options: Options,
}

impl Recovery {
    /// Text of the error response for a caught panic.
    fn message(&self, err: &Error, site: Option<PanicSite>) -> String {
        let mut text = err.to_string();
        if self.options.stack_trace() {
            let site = site.unwrap_or_else(PanicSite::here);
            let _ = write!(text, "\n\n# Debug stack\n{site}");
        }
        text
    }
}

impl Handler for Recovery {
    fn serve<'a>(&'a self, req: Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            // The writer may be left mid-response by the panic; whatever the
            // handler wrote stays written.
            let call = future::lazy(|_| self.next.serve(req, &mut *res)).flatten();
            let outcome = AssertUnwindSafe(Armed::new(Box::pin(call), self.options.stack_trace()))
                .catch_unwind()
                .await;
            let Err(payload) = outcome else { return };

            let site = PanicSite::take();
            let err = Error::Panic(Recovered::from_payload(payload));
            error!(error = %err, "handler panicked");
            if let Err(e) = write_error(res, StatusCode::INTERNAL_SERVER_ERROR, &self.message(&err, site)) {
                warn!("failed to write error response: {e}");
            }
        })
    }
}
