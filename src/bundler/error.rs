//! Error types for package orchestration.
//!
//! Every failure a packaging task can hit is expressed as a variant of
//! [`Error`]. Context helpers ([`Context`], [`ErrorExt`]) and the [`bail!`]
//! macro keep call sites short.
//!
//! [`bail!`]: crate::bail

use std::{fmt::Display, path::PathBuf};

/// Result alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while selecting, assembling and packaging Linux packages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Free-form error message.
    #[error("{0}")]
    GenericError(String),

    /// An error wrapped with a message describing what was being done.
    #[error("{0}: {1}")]
    Context(String, Box<Error>),

    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// What was being attempted.
        context: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        error: std::io::Error,
    },

    /// Raw IO error without path information.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// No binary matched a package definition's build filter.
    #[error("no linux binaries found for builds {builds:?}")]
    NoMatchingBinaries {
        /// Build IDs that were requested (empty means all).
        builds: Vec<String>,
    },

    /// A templated field failed to render.
    #[error("failed to apply template {template:?}: {source}")]
    Template {
        /// Template text that failed.
        template: String,
        /// Renderer error.
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// No packaging backend is registered for the format.
    #[error("no packager registered for format {0:?}")]
    UnknownFormat(String),

    /// The packaging backend failed to produce the package.
    #[error("nfpm failed for {file}: {source}")]
    Packaging {
        /// Output file name being produced.
        file: String,
        /// Backend error.
        #[source]
        source: Box<Error>,
    },

    /// Glob pattern in a content source is malformed.
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory traversal failed while expanding content sources.
    #[error("failed to walk directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// A spawned packaging task panicked or was aborted.
    #[error("packaging task failed to complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Attach a message to an error or an empty option.
pub trait Context<T> {
    /// Wraps the failure with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Wraps the failure with a lazily computed message.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Attach path information to IO errors.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`] for `path`.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Return early with a [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
