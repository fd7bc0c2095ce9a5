//! Request and response block rendering.
//!
//! A block is a heading line followed by one `- Field: value` line per
//! enabled field. Disabled fields are `None` in the view and produce no line
//! at all.

use std::fmt::{self, Write};
use std::time::Duration;

/// What the request block shows.
#[derive(Debug, Default)]
pub(crate) struct RequestView<'a> {
    pub method: Option<&'a str>,
    pub url: Option<String>,
    /// `-1` when the length is unknown.
    pub content_length: Option<i64>,
    pub body: Option<&'a str>,
}

/// What the response block shows.
#[derive(Debug, Default)]
pub(crate) struct ResponseView<'a> {
    pub duration: Option<Duration>,
    pub status: Option<u16>,
    pub content_length: Option<usize>,
    pub body: Option<&'a str>,
}

pub(crate) fn request(view: &RequestView<'_>) -> Result<String, fmt::Error> {
    let mut out = String::from("# Request");
    if let Some(method) = view.method {
        write!(out, "\n- Method: {method}")?;
    }
    if let Some(url) = &view.url {
        write!(out, "\n- URL: {url}")?;
    }
    if let Some(n) = view.content_length {
        write!(out, "\n- Content length: {n}")?;
    }
    if let Some(body) = view.body {
        write!(out, "\n- Body: {body}")?;
    }
    Ok(out)
}

pub(crate) fn response(view: &ResponseView<'_>) -> Result<String, fmt::Error> {
    let mut out = String::from("# Response");
    if let Some(d) = view.duration {
        write!(out, "\n- Duration: {}µs", d.as_micros())?;
    }
    if let Some(status) = view.status {
        write!(out, "\n- Status: {status}")?;
    }
    if let Some(n) = view.content_length {
        write!(out, "\n- Content length: {n}")?;
    }
    if let Some(body) = view.body {
        write!(out, "\n- Body: {body}")?;
    }
    Ok(out)
}
