//! The response-writer interface and its buffered implementation.
//!
//! Handlers do not return a response; they write one. A handler receives a
//! `&mut dyn ResponseWriter`, sets a status once, then writes body bytes.
//! Middleware can hand the handler a wrapper instead of the real writer to
//! observe what it does (see [`middleware::capture`](crate::middleware::capture)).
//!
//! [`Response`] is the writer the server uses. It buffers the whole response
//! and hands it to hyper once the handler chain returns. Tests use it as a
//! recorder.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderMap, HeaderValue, StatusCode};
use http_body_util::Full;
use tracing::warn;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`ResponseWriter::content_type`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream
    Text,         // text/plain; charset=utf-8
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
        }
    }
}

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// Outbound half of a request: what a handler writes its response to.
///
/// The status line is committed by the first [`set_status`](Self::set_status)
/// or, failing that, the first [`write`](Self::write) (which implies `200 OK`).
/// After that, header changes and further status calls have no effect on what
/// the client receives.
pub trait ResponseWriter: Send {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sets the status code. Only the first call takes effect.
    fn set_status(&mut self, status: StatusCode);

    /// Appends `buf` to the body and returns the number of bytes accepted.
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize>;

    /// Whether the status line (and with it, the headers) is committed.
    fn headers_sent(&self) -> bool;

    fn content_type(&mut self, content_type: ContentType) {
        self.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
    }
}

/// Writes a plain-text error response: `status`, then exactly `message`.
///
/// Content headers are only set while they can still reach the client. If the
/// handler already committed a status, the message is appended to whatever it
/// wrote.
pub fn write_error(
    res: &mut dyn ResponseWriter,
    status: StatusCode,
    message: &str,
) -> std::io::Result<()> {
    if !res.headers_sent() {
        res.content_type(ContentType::Text);
        res.headers_mut()
            .insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        res.set_status(status);
    }
    res.write(message.as_bytes()).map(drop)
}

// ── Response ──────────────────────────────────────────────────────────────────

/// A buffered response.
///
/// The server creates one per request, runs the handler chain against it,
/// then converts it into a hyper response. Outside the server it works as a
/// recorder:
///
/// ```rust
/// use tollgate::{Response, ResponseWriter};
/// use http::StatusCode;
///
/// let mut res = Response::new();
/// res.set_status(StatusCode::CREATED);
/// res.write(b"done").unwrap();
///
/// assert_eq!(res.status(), StatusCode::CREATED);
/// assert_eq!(res.body(), b"done");
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    committed: bool,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            committed: false,
        }
    }

    /// The committed status, or `200 OK` if the handler never set one.
    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

impl Default for Response {
    fn default() -> Self { Self::new() }
}

impl ResponseWriter for Response {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn set_status(&mut self, status: StatusCode) {
        if self.committed {
            warn!(current = %self.status, ignored = %status, "superfluous set_status call");
            return;
        }
        self.status = status;
        self.committed = true;
    }

    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !self.committed {
            self.set_status(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn headers_sent(&self) -> bool {
        self.committed
    }
}
