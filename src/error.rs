//! Unified error type.

use std::any::Any;
use std::fmt;

/// A boxed, thread-safe error. The error type of request bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error type returned by tollgate's fallible operations.
///
/// Handler-level failures are still expressed as HTTP responses; the
/// middlewares build an `Error`, log it, and write its text as a `500`.
/// Only [`Error::Io`] ever escapes as an `Err`, from [`Server::serve`](crate::Server::serve).
#[derive(Debug)]
pub enum Error {
    /// Binding to a port or accepting a connection failed.
    Io(std::io::Error),
    /// The request body could not be drained.
    ReadBody(BoxError),
    /// A log block could not be rendered.
    Render { block: &'static str, source: fmt::Error },
    /// A handler panicked and the panic was caught.
    Panic(Recovered),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::ReadBody(e) => write!(f, "error reading request body: {e}"),
            Self::Render { block, source } => write!(f, "error rendering {block} block: {source}"),
            Self::Panic(r) => write!(f, "recovered from panic: {r}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ReadBody(e) => Some(e.as_ref()),
            Self::Render { source, .. } => Some(source),
            Self::Panic(Recovered::Error(e)) => Some(e.as_ref()),
            Self::Panic(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ── Recovered panic payloads ─────────────────────────────────────────────────

/// A panic payload, classified by what was thrown.
#[derive(Debug)]
pub enum Recovered {
    /// `panic!("…")` with a literal or formatted message.
    Message(String),
    /// An error value thrown with [`std::panic::panic_any`].
    Error(BoxError),
    /// Anything else.
    Unknown,
}

impl Recovered {
    /// Classifies the payload handed back by `catch_unwind`.
    ///
    /// Recognised error payloads are `BoxError`, [`std::io::Error`] and
    /// tollgate's own [`Error`].
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<&'static str>() {
            Ok(msg) => return Self::Message((*msg).to_owned()),
            Err(p) => p,
        };
        let payload = match payload.downcast::<String>() {
            Ok(msg) => return Self::Message(*msg),
            Err(p) => p,
        };
        let payload = match payload.downcast::<BoxError>() {
            Ok(e) => return Self::Error(*e),
            Err(p) => p,
        };
        let payload = match payload.downcast::<std::io::Error>() {
            Ok(e) => return Self::Error(Box::new(*e)),
            Err(p) => p,
        };
        match payload.downcast::<Error>() {
            Ok(e) => Self::Error(Box::new(*e)),
            Err(_) => Self::Unknown,
        }
    }
}

impl fmt::Display for Recovered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(msg) => f.write_str(msg),
            Self::Error(e) => write!(f, "{e}"),
            Self::Unknown => f.write_str("unknown recovery type"),
        }
    }
}
