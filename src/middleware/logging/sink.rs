//! Log sinks: where rendered request and response blocks go.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Local;
use tracing::{info, warn};

/// Accepts rendered log entries.
///
/// A sink is shared by every in-flight request, so implementations must
/// serialise concurrent calls themselves. Write failures are not reported
/// back to the middleware.
pub trait LogSink: Send + Sync {
    fn log(&self, entry: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, entry: &str) {
        self(entry)
    }
}

fn stamp() -> impl std::fmt::Display {
    Local::now().format("%Y/%m/%d %H:%M:%S")
}

/// Writes each entry to standard output, prefixed with the local date and
/// time. The default sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stdout;

impl LogSink for Stdout {
    fn log(&self, entry: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{} {entry}", stamp()) {
            warn!("failed to write log entry to stdout: {e}");
        }
    }
}

/// Writes each entry to `W` behind a mutex, with the same timestamp prefix
/// as [`Stdout`].
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    /// Returns the writer, e.g. to inspect a `Vec<u8>` buffer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn log(&self, entry: &str) {
        // A panic mid-write leaves at worst a torn line; keep logging.
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(writer, "{} {entry}", stamp()) {
            warn!("failed to write log entry: {e}");
        }
    }
}

/// Forwards each entry to `tracing` at `INFO`, for services that already
/// route their output through a subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, entry: &str) {
        info!(target: "tollgate::logging", "{entry}");
    }
}
