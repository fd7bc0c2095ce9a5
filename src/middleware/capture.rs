//! Response capturing adapter.
//!
//! [`CapturingWriter`] sits between a handler and the real writer. Every call
//! is forwarded untouched; on the way through, the adapter remembers the last
//! status and the last body chunk so middleware can report them afterwards.

use http::{HeaderMap, StatusCode};

use crate::response::ResponseWriter;

/// Records the status and body a handler writes while passing both through.
///
/// The status starts at `500 Internal Server Error`: a handler that never
/// calls `set_status` is reported as failed, even if the writer underneath
/// committed an implicit `200` on first write.
///
/// Only the most recent `write` is kept. A handler that writes in several
/// chunks is reported with its final chunk as the body, and that chunk's
/// length as the content length.
pub struct CapturingWriter<'w> {
    inner: &'w mut dyn ResponseWriter,
    status: StatusCode,
    body: Vec<u8>,
}

impl<'w> CapturingWriter<'w> {
    pub fn new(inner: &'w mut dyn ResponseWriter) -> Self {
        Self { inner, status: StatusCode::INTERNAL_SERVER_ERROR, body: Vec::new() }
    }

    /// Last status passed to `set_status`.
    pub fn status(&self) -> StatusCode { self.status }

    /// Last chunk passed to `write`.
    pub fn body(&self) -> &[u8] { &self.body }
}

impl ResponseWriter for CapturingWriter<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.inner.set_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.body.clear();
        self.body.extend_from_slice(buf);
        self.inner.write(buf)
    }

    fn headers_sent(&self) -> bool {
        self.inner.headers_sent()
    }
}
