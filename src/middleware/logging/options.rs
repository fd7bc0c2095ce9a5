//! Logging middleware configuration.

use std::fmt;
use std::sync::Arc;

use super::sink::{LogSink, Stdout};

/// One configuration change, applied in order by [`Options::new`].
pub enum Setting {
    /// Where rendered blocks go.
    Sink(Arc<dyn LogSink>),
    /// Log request and response bodies.
    Bodies(bool),
    /// Log the response status.
    Status(bool),
    /// Log the request method.
    Method(bool),
    /// Log the request URL.
    Url(bool),
    /// Log request and response content lengths.
    ContentLengths(bool),
    /// Log how long the downstream handler took.
    Duration(bool),
}

/// Immutable logging configuration.
///
/// Every field is off by default and entries go to standard output. Build
/// from an ordered list of [`Setting`]s, where a later setting overrides an
/// earlier one:
///
/// ```rust
/// use tollgate::middleware::logging::{Options, Setting};
///
/// let options = Options::new([Setting::Method(true), Setting::Url(true)]);
/// assert!(options.method() && options.url() && !options.bodies());
/// ```
///
/// or fluently:
///
/// ```rust
/// use tollgate::middleware::logging::{Options, TracingSink};
///
/// let options = Options::builder()
///     .sink(TracingSink)
///     .status(true)
///     .duration(true)
///     .build();
/// ```
#[derive(Clone)]
pub struct Options {
    sink: Arc<dyn LogSink>,
    bodies: bool,
    status: bool,
    method: bool,
    url: bool,
    content_lengths: bool,
    duration: bool,
}

impl Options {
    pub fn new(settings: impl IntoIterator<Item = Setting>) -> Self {
        settings.into_iter().fold(Self::default(), Self::apply)
    }

    pub fn builder() -> OptionsBuilder {
        OptionsBuilder { options: Self::default() }
    }

    fn apply(mut self, setting: Setting) -> Self {
        match setting {
            Setting::Sink(sink) => self.sink = sink,
            Setting::Bodies(on) => self.bodies = on,
            Setting::Status(on) => self.status = on,
            Setting::Method(on) => self.method = on,
            Setting::Url(on) => self.url = on,
            Setting::ContentLengths(on) => self.content_lengths = on,
            Setting::Duration(on) => self.duration = on,
        }
        self
    }

    pub fn sink(&self) -> &dyn LogSink { &*self.sink }
    pub fn bodies(&self) -> bool { self.bodies }
    pub fn status(&self) -> bool { self.status }
    pub fn method(&self) -> bool { self.method }
    pub fn url(&self) -> bool { self.url }
    pub fn content_lengths(&self) -> bool { self.content_lengths }
    pub fn duration(&self) -> bool { self.duration }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sink: Arc::new(Stdout),
            bodies: false,
            status: false,
            method: false,
            url: false,
            content_lengths: false,
            duration: false,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("bodies", &self.bodies)
            .field("status", &self.status)
            .field("method", &self.method)
            .field("url", &self.url)
            .field("content_lengths", &self.content_lengths)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

/// Fluent builder for [`Options`]. Obtain via [`Options::builder()`].
#[derive(Clone, Debug)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Applies a single [`Setting`].
    pub fn apply(mut self, setting: Setting) -> Self {
        self.options = self.options.apply(setting);
        self
    }

    pub fn sink(self, sink: impl LogSink + 'static) -> Self {
        self.apply(Setting::Sink(Arc::new(sink)))
    }

    pub fn bodies(self, on: bool) -> Self { self.apply(Setting::Bodies(on)) }
    pub fn status(self, on: bool) -> Self { self.apply(Setting::Status(on)) }
    pub fn method(self, on: bool) -> Self { self.apply(Setting::Method(on)) }
    pub fn url(self, on: bool) -> Self { self.apply(Setting::Url(on)) }
    pub fn content_lengths(self, on: bool) -> Self { self.apply(Setting::ContentLengths(on)) }
    pub fn duration(self, on: bool) -> Self { self.apply(Setting::Duration(on)) }

    /// Turns every field on.
    pub fn all(self) -> Self {
        self.bodies(true)
            .status(true)
            .method(true)
            .url(true)
            .content_lengths(true)
            .duration(true)
    }

    pub fn build(self) -> Options {
        self.options
    }
}
