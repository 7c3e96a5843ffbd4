use std::fmt;

use error_stack::{report, Report};

/// Error messages
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    // === file operations ===
    #[error("failed to read from `{0}`")]
    ReadFile(String),
    #[error("failed to write to `{0}`")]
    WriteFile(String),

    // === stream operations ===
    #[error("failed to read from {0}")]
    ReadStream(&'static str),

    // === terminal operations ===
    #[error("{0} is not a terminal")]
    NotTerminal(&'static str),
    #[error("cannot get terminal size of {0}")]
    TerminalSize(&'static str),
    #[error("cannot get terminal attributes of {0}")]
    TerminalModes(&'static str),
    #[error("cannot get tty name of {0}")]
    TtyName(&'static str),
}

/// Marker trait for errors that can be used
/// in the context wrapper system
pub trait Context: error_stack::Context {}

/// Trait for wrapping execution with some context
pub trait ChangeContext: Sized {
    type Target: error_stack::Context;
    fn change_context(report: Report<impl Context>) -> Report<Self::Target>;
}

/// Wrapper for Report so we can implement our own traits
#[repr(transparent)]
pub struct ReportWrapper<CC: ChangeContext>(Report<CC::Target>);

impl<CC: ChangeContext> ReportWrapper<CC> {
    /// Unwrap the report with the target context
    pub fn into_report(self) -> Report<CC::Target> {
        self.0
    }
}

impl<CC: ChangeContext> fmt::Debug for ReportWrapper<CC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// A Result type that wraps errors with context
/// automatically when using the `?` operator
pub type ResultIn<T, C> = Result<T, ReportWrapper<C>>;

impl<E: Context, CC: ChangeContext> From<E> for ReportWrapper<CC> {
    #[track_caller]
    fn from(value: E) -> Self {
        Self(CC::change_context(report!(value)))
    }
}

impl<E: Context, CC: ChangeContext> From<Report<E>> for ReportWrapper<CC> {
    #[track_caller]
    fn from(value: Report<E>) -> Self {
        Self(CC::change_context(value))
    }
}

impl<CC: ChangeContext> From<ReportWrapper<CC>> for Report<CC::Target> {
    fn from(value: ReportWrapper<CC>) -> Report<CC::Target> {
        value.0
    }
}

/// Create a type and implement the ChangeContext trait for it
#[macro_export]
macro_rules! error_context {
    ($ty:ident, | $report:ident | -> $target:ty $body:block) => {
        struct $ty;
        impl $crate::system::ChangeContext for $ty {
            type Target = $target;
            #[inline]
            fn change_context($report: error_stack::Report<impl $crate::system::Context>) -> error_stack::Report<$target> {
                $body
            }
        }
    };
    ($vis:vis $ty:ident, | $report:ident | -> $target:ty $body:block) => {
        $vis struct $ty;
        impl $crate::system::ChangeContext for $ty {
            type Target = $target;
            #[inline]
            fn change_context($report: error_stack::Report<impl $crate::system::Context>) -> error_stack::Report<$target> {
                $body
            }
        }
    }
}

// foreign errors that pass through `?` into a ResultIn

impl Context for Error {}
impl Context for std::io::Error {}
impl Context for regex::Error {}
impl Context for toml::de::Error {}
