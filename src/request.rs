//! Incoming HTTP request type.

use std::collections::HashMap;

use http::header::CONTENT_LENGTH;
use http::{HeaderMap, Method, Uri};

use crate::body::Body;
use crate::error::BoxError;

/// An incoming HTTP request: the parsed head, a streaming body, and any path
/// parameters the router matched.
pub struct Request {
    pub(crate) head: http::request::Parts,
    pub(crate) body: Body,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub fn method(&self) -> &Method { &self.head.method }
    pub fn uri(&self) -> &Uri { &self.head.uri }
    pub fn headers(&self) -> &HeaderMap { &self.head.headers }
    pub fn body(&self) -> &Body { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Declared body length: the `content-length` header, else the body's
    /// exact size, else `None`.
    pub fn content_length(&self) -> Option<u64> {
        self.head.headers.get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .or_else(|| self.body.exact_len())
    }

    /// Takes the body out, leaving an empty one behind.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }

    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }

    /// Drains the body into memory and puts the bytes back as a buffered
    /// body, so later readers see the same payload.
    ///
    /// The streaming body is dropped whether or not the read succeeds.
    pub async fn buffer_body(&mut self) -> Result<bytes::Bytes, BoxError> {
        let bytes = self.take_body().collect().await?;
        self.body = Body::from(bytes.clone());
        Ok(bytes)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

impl<B> From<http::Request<B>> for Request
where
    B: Into<Body>,
{
    fn from(req: http::Request<B>) -> Self {
        let (head, body) = req.into_parts();
        Self { head, body: body.into(), params: HashMap::new() }
    }
}
