//! Linux package builder library for release pipelines
//!
//! This library turns compiled binaries into native Linux packages:
//! - Debian packages (.deb, including Termux and iOS flavours)
//! - RPM, Alpine and Arch Linux packages through caller-provided backends
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
