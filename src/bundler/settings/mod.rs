//! Configuration structures for Linux packaging.
//!
//! This module provides the run-wide [`Settings`], the user-declared
//! [`PackageDefinition`]s with their per-format overrides, and the
//! format-specific blocks those definitions carry.

mod arch;
mod builder;
mod content;
mod core;
mod linux;
pub(crate) mod overrides;
mod package;

// Re-export all public types
pub use arch::{IPHONEOS_PLATFORM, PackageTarget, TERMUX_FORMAT, TERMUX_PREFIX, TargetCheck};
pub use builder::SettingsBuilder;
pub use content::{ContentEntry, ContentType, FileInfo, destinations};
pub use self::core::Settings;
pub use linux::{
    ApkSettings, ApkSignatureSettings, ArchLinuxSettings, DebScripts, DebSettings,
    DebSignatureSettings, DebTriggers, RpmScripts, RpmSettings, Scripts, SignatureSettings,
    UpgradeScripts,
};
pub use overrides::Layer;
pub use package::{
    DEFAULT_BINDIR, DEFAULT_FILE_NAME_TEMPLATE, DEFAULT_ID, Overridables, PackageDefinition,
};
