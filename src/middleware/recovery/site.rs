//! Records where a panic was raised.
//!
//! After unwinding, a backtrace taken by the recovering code no longer
//! contains the panicking frame. A panic hook runs before unwinding starts, so
//! the hook installed here captures the location and stack while they are
//! still on the thread, and [`Recovery`](super::Recovery) picks them up once
//! `catch_unwind` returns.
//!
//! The hook chains to whatever hook was installed before it, so the usual
//! stderr report is unchanged. It only records anything while a recovery
//! layer with stack traces enabled is polling on the current thread.

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::sync::Once;
use std::task::{Context, Poll};

use futures::FutureExt;

thread_local! {
    static ARMED: Cell<bool> = const { Cell::new(false) };
    static LAST: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Location and stack of a panic, captured before unwinding.
pub(super) struct PanicSite {
    location: Option<String>,
    backtrace: Backtrace,
}

impl PanicSite {
    /// Capture taken at the recovery point, used when the hook saw nothing
    /// (another hook replaced it, or the payload came from `resume_unwind`).
    pub(super) fn here() -> Self {
        Self { location: None, backtrace: Backtrace::force_capture() }
    }

    /// Takes the site recorded by the hook on this thread, if any.
    pub(super) fn take() -> Option<Self> {
        LAST.with(|last| last.borrow_mut().take())
    }
}

impl fmt::Display for PanicSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            writeln!(f, "panicked at {location}")?;
        }
        write!(f, "{}", self.backtrace)
    }
}

/// Installs the recording hook once per process.
pub(super) fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if ARMED.with(Cell::get) {
                let site = PanicSite {
                    location: info.location().map(ToString::to_string),
                    backtrace: Backtrace::force_capture(),
                };
                LAST.with(|last| *last.borrow_mut() = Some(site));
            }
            previous(info);
        }));
    });
}

/// Restores the previous armed state, also while unwinding.
struct Disarm(bool);

impl Drop for Disarm {
    fn drop(&mut self) {
        ARMED.with(|armed| armed.set(self.0));
    }
}

/// Polls `inner` with the hook armed on the polling thread.
pub(super) struct Armed<F> {
    inner: F,
    enabled: bool,
}

impl<F> Armed<F> {
    pub(super) fn new(inner: F, enabled: bool) -> Self {
        Self { inner, enabled }
    }
}

impl<F: Future + Unpin> Future for Armed<F> {
    type Output = F::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<F::Output> {
        if !self.enabled {
            return self.inner.poll_unpin(cx);
        }
        // A site left over from a panic the handler caught itself is stale.
        LAST.with(|last| last.borrow_mut().take());
        let _disarm = Disarm(ARMED.with(|armed| armed.replace(true)));
        self.inner.poll_unpin(cx)
    }
}
