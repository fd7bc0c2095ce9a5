//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use http::HeaderMap;
use tollgate::middleware::logging::LogSink;
use tollgate::{Body, Handler, Method, Request, Response, ResponseWriter, StatusCode};

/// A sink that keeps every entry in memory.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<String>>>);

impl Captured {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn joined(&self) -> String {
        self.entries().join("\n")
    }
}

impl LogSink for Captured {
    fn log(&self, entry: &str) {
        self.0.lock().unwrap().push(entry.to_owned());
    }
}

pub fn request(method: Method, uri: &str, body: impl Into<Body>) -> Request {
    Request::from(
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(body.into())
            .unwrap(),
    )
}

/// Runs `handler` against a fresh recorder.
pub async fn call(handler: &impl Handler, req: Request) -> Response {
    let mut res = Response::new();
    handler.serve(req, &mut res).await;
    res
}

/// A writer whose client has gone away: every `write` fails.
#[derive(Default)]
pub struct Refusing {
    headers: HeaderMap,
    pub status: Option<StatusCode>,
}

impl ResponseWriter for Refusing {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
    }

    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn headers_sent(&self) -> bool {
        self.status.is_some()
    }
}

/// Collects `tracing` output for the current thread.
#[derive(Clone, Default)]
pub struct Traced(Arc<Mutex<Vec<u8>>>);

impl Traced {
    /// Routes this thread's events here until the guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Traced {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
