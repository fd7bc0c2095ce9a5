//! Request/response logging middleware.
//!
//! For every request the middleware writes two entries to its [`LogSink`]:
//!
//! ```text
//! # Request
//! - Method: GET
//! - URL: /users/42
//! - Content length: 0
//! - Body:
//! ```
//!
//! and, once the downstream handler returns:
//!
//! ```text
//! # Response
//! - Duration: 182µs
//! - Status: 200
//! - Content length: 27
//! - Body: {"id":"42","name":"alice"}
//! ```
//!
//! Each `- Field` line is switched on individually through [`Options`];
//! switched-off fields are left out.
//!
//! # Caveats
//!
//! - With bodies enabled, the request body is read fully into memory before
//!   the handler runs. There is no size cap.
//! - The response side is observed through a
//!   [`CapturingWriter`](super::capture::CapturingWriter): status is `500`
//!   unless the handler set one explicitly, and only the handler's last
//!   `write` shows up as the body and content length.

mod options;
mod render;
mod sink;

use std::sync::Arc;
use std::time::Instant;

use http::StatusCode;
use tracing::warn;

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::request::Request;
use crate::response::{write_error, ResponseWriter};

use super::capture::CapturingWriter;
use render::{RequestView, ResponseView};

pub use options::{Options, OptionsBuilder, Setting};
pub use sink::{LogSink, Stdout, TracingSink, WriterSink};

/// Builds the logging middleware.
///
/// ```rust
/// use tollgate::middleware::logging::{self, Options};
/// use tollgate::{Handler, Router};
///
/// let app = Router::new().with(logging::middleware(Options::builder().all().build()));
/// ```
pub fn middleware(options: Options) -> impl Fn(BoxedHandler) -> BoxedHandler + Clone + Send + Sync + 'static {
    let options = Arc::new(options);
    move |next: BoxedHandler| Logging { next, options: Arc::clone(&options) }.boxed()
}

struct Logging {
    next: BoxedHandler,
    options: Arc<Options>,
}

impl Logging {
    /// Logs `err` and answers with a `500` carrying its text.
    fn reject(&self, res: &mut dyn ResponseWriter, err: &Error) {
        self.options.sink().log(&format!("Error: {err}"));
        if let Err(e) = write_error(res, StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()) {
            warn!("failed to write error response: {e}");
        }
    }

    fn request_view<'a>(&self, req: &'a Request, body: &'a str) -> RequestView<'a> {
        let o = &self.options;
        RequestView {
            method: o.method().then(|| req.method().as_str()),
            // HTTP/2 requests carry an absolute URI; only path and query are logged.
            url: o.url().then(|| {
                req.uri().path_and_query().map_or_else(|| "/".to_owned(), ToString::to_string)
            }),
            content_length: o.content_lengths().then(|| {
                req.content_length()
                    .and_then(|n| i64::try_from(n).ok())
                    .unwrap_or(-1)
            }),
            body: o.bodies().then_some(body),
        }
    }
}

impl Handler for Logging {
    fn serve<'a>(&'a self, mut req: Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            let options = &*self.options;
            let mut res = CapturingWriter::new(res);

            let mut body = String::new();
            if options.bodies() {
                match req.buffer_body().await {
                    Ok(bytes) => body = String::from_utf8_lossy(&bytes).into_owned(),
                    Err(e) => return self.reject(&mut res, &Error::ReadBody(e)),
                }
            }

            let block = render::request(&self.request_view(&req, &body))
                .map_err(|source| Error::Render { block: "request", source });
            match block {
                Ok(block) => options.sink().log(&block),
                Err(e) => return self.reject(&mut res, &e),
            }

            let start = Instant::now();
            self.next.serve(req, &mut res).await;
            let elapsed = start.elapsed();

            let captured = String::from_utf8_lossy(res.body());
            let view = ResponseView {
                duration: options.duration().then_some(elapsed),
                status: options.status().then(|| res.status().as_u16()),
                content_length: options.content_lengths().then(|| res.body().len()),
                body: options.bodies().then_some(captured.as_ref()),
            };
            let block = render::response(&view)
                .map_err(|source| Error::Render { block: "response", source });
            drop(captured);

            match block {
                Ok(block) => options.sink().log(&block),
                Err(e) => {
                    options.sink().log(&format!("Error: {e}"));
                    if !res.headers_sent() {
                        if let Err(e) = write_error(&mut res, StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()) {
                            warn!("failed to write error response: {e}");
                        }
                    }
                }
            }
        })
    }
}
