//! Packaging backends.
//!
//! A [`Packager`] encodes a [`PackageInfo`] into one package format. Backends
//! are looked up by format name in a [`PackagerRegistry`] that the caller
//! builds and hands to the [`Bundler`](crate::bundler::Bundler).

mod info;
pub mod linux;

pub use info::{
    ApkInfo, ApkSignature, ArchLinuxInfo, DebInfo, DebSignature, PackageInfo, PackageSignature,
    RpmInfo, RpmSignature,
};

use crate::bundler::error::{Error, Result};
use std::{collections::HashMap, io::Write, sync::Arc};

/// Prefix marking a format variant built by its base packager.
const TERMUX_PREFIX: &str = "termux.";

/// Encodes package descriptors into one package format.
///
/// Implementations run on a blocking thread and may do file IO and
/// compression freely.
pub trait Packager: Send + Sync {
    /// Canonical file name for `info`, e.g. `foo_1.0.0_amd64.deb`.
    fn conventional_file_name(&self, info: &PackageInfo) -> String;

    /// Canonical extension including the leading dot, if the format has one.
    fn conventional_extension(&self) -> Option<&str> {
        None
    }

    /// Writes the package described by `info` to `writer`.
    fn package(&self, info: &PackageInfo, writer: &mut dyn Write) -> Result<()>;
}

/// Format name → packager lookup table.
#[derive(Clone, Default)]
pub struct PackagerRegistry {
    packagers: HashMap<String, Arc<dyn Packager>>,
}

impl std::fmt::Debug for PackagerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats: Vec<_> = self.packagers.keys().collect();
        formats.sort();
        f.debug_struct("PackagerRegistry")
            .field("formats", &formats)
            .finish()
    }
}

impl PackagerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in Linux packagers.
    pub fn linux() -> Self {
        Self::new().with("deb", linux::debian::DebPackager)
    }

    /// Registers `packager` for `format`, replacing any previous entry.
    pub fn register(&mut self, format: impl Into<String>, packager: impl Packager + 'static) {
        self.packagers.insert(format.into(), Arc::new(packager));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, format: impl Into<String>, packager: impl Packager + 'static) -> Self {
        self.register(format, packager);
        self
    }

    /// Packager for `format`; a `termux.` prefix resolves to the base format.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFormat`] if nothing is registered.
    pub fn get(&self, format: &str) -> Result<Arc<dyn Packager>> {
        let base = format.strip_prefix(TERMUX_PREFIX).unwrap_or(format);
        self.packagers
            .get(base)
            .cloned()
            .ok_or_else(|| Error::UnknownFormat(format.to_string()))
    }

    /// Registered format names, sorted.
    pub fn formats(&self) -> Vec<&str> {
        let mut formats: Vec<_> = self.packagers.keys().map(String::as_str).collect();
        formats.sort_unstable();
        formats
    }
}
