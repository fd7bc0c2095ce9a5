//! Recovery middleware configuration.

/// One configuration change, applied in order by [`Options::new`].
#[derive(Clone, Copy, Debug)]
pub enum Setting {
    /// Append the stack trace captured at the recovery point to the error
    /// response. Capturing ignores `RUST_BACKTRACE`.
    StackTrace(bool),
}

/// Immutable recovery configuration. Stack traces are off by default.
///
/// ```rust
/// use tollgate::middleware::recovery::{Options, Setting};
///
/// assert!(Options::new([Setting::StackTrace(true)]).stack_trace());
/// assert!(Options::builder().stack_trace(true).build().stack_trace());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    stack_trace: bool,
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
            Setting::StackTrace(on) => self.stack_trace = on,
        }
        self
    }

    pub fn stack_trace(&self) -> bool { self.stack_trace }
}

/// Fluent builder for [`Options`]. Obtain via [`Options::builder()`].
#[derive(Clone, Copy, Debug)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    pub fn apply(mut self, setting: Setting) -> Self {
        self.options = self.options.apply(setting);
        self
    }

    pub fn stack_trace(self, on: bool) -> Self {
        self.apply(Setting::StackTrace(on))
    }

    pub fn build(self) -> Options {
        self.options
    }
}
