//! Request body.
//!
//! Bodies are streamed by hyper and can fail mid-read (client hangs up,
//! malformed chunked encoding, …). [`Body`] erases the concrete body type so
//! requests built from hyper, from bytes, or from a test stream all look the
//! same to handlers and middleware.

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Body as HttpBody, Frame};

use crate::error::BoxError;

/// A type-erased, possibly failing request body.
pub struct Body(UnsyncBoxBody<Bytes, BoxError>);

impl Body {
    /// Wraps any `http_body::Body` yielding [`Bytes`].
    pub fn new<B>(body: B) -> Self
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self(body.map_err(Into::into).boxed_unsync())
    }

    pub fn empty() -> Self {
        Self::new(Empty::<Bytes>::new())
    }

    /// Builds a body from a stream of chunks. A stream error surfaces as a
    /// read error when the body is collected.
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::new(StreamBody::new(stream.map_ok(Frame::data)))
    }

    /// Length in bytes, when the body knows it up front.
    pub fn exact_len(&self) -> Option<u64> {
        self.0.size_hint().exact()
    }

    /// Reads the whole body into memory.
    ///
    /// There is no size cap: a client streaming an endless body grows this
    /// buffer until it ends. Limit body size at the proxy.
    pub async fn collect(self) -> Result<Bytes, BoxError> {
        Ok(BodyExt::collect(self.0).await?.to_bytes())
    }
}

impl Default for Body {
    fn default() -> Self { Self::empty() }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self { Self::new(Full::new(bytes)) }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self { Self::from(Bytes::from(bytes)) }
}

impl From<String> for Body {
    fn from(text: String) -> Self { Self::from(Bytes::from(text)) }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self { Self::from(Bytes::from_static(text.as_bytes())) }
}

impl From<hyper::body::Incoming> for Body {
    fn from(body: hyper::body::Incoming) -> Self { Self::new(body) }
}
