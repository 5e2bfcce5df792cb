//! Linux package builder for release pipelines.
//!
//! This module turns already-compiled binaries into native Linux packages
//! (.deb, .rpm, .apk, Arch Linux and Termux .deb) and records the results in
//! a shared artifact store.
//!
//! # Configuration
//!
//! Packages are declared as `[[nfpms]]` tables:
//!
//! ```toml
//! [[nfpms]]
//! id = "cli"
//! formats = ["deb", "rpm"]
//! maintainer = "Jane Doe <jane@example.com>"
//! description = "Does things"
//!
//! [nfpms.overrides.rpm]
//! dependencies = ["glibc"]
//! ```
//!
//! # Backends
//!
//! | Format | Backend | Notes |
//! |--------|---------|-------|
//! | deb, termux.deb | built in | unsigned |
//! | rpm, apk, archlinux | caller provided | register on [`PackagerRegistry`] |
//!
//! # Integration
//!
//! ```no_run
//! use kodegen_bundler_linux::bundler::{
//!     ArtifactStore, Bundler, PackageDefinition, PackagerRegistry, SettingsBuilder,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> kodegen_bundler_linux::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .project_name("myapp")
//!     .version("1.0.0")
//!     .build()?;
//!
//! let store = Arc::new(ArtifactStore::default());
//! let bundler = Bundler::new(settings, PackagerRegistry::linux(), store);
//! let outcomes = bundler.bundle(&[PackageDefinition::default()]).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod artifact;
mod builder;
mod error;
pub mod platform;
mod settings;
pub mod template;
mod utils;

// Public re-exports
pub use artifact::{Artifact, ArtifactKind, ArtifactStore, PlatformGroup, group_by_platform};
pub use builder::{Bundler, PackageTask, TaskOutcome, passphrase_from_env, run_bounded, with_extension};
pub use error::{Context, Error, ErrorExt, Result};
pub use platform::{PackageInfo, Packager, PackagerRegistry};
pub use settings::{
    // Content
    ContentEntry,
    ContentType,
    FileInfo,
    // Format blocks
    ApkSettings,
    ApkSignatureSettings,
    ArchLinuxSettings,
    DebScripts,
    DebSettings,
    DebSignatureSettings,
    DebTriggers,
    RpmScripts,
    RpmSettings,
    Scripts,
    SignatureSettings,
    UpgradeScripts,
    // Definitions
    DEFAULT_BINDIR,
    DEFAULT_FILE_NAME_TEMPLATE,
    DEFAULT_ID,
    Overridables,
    PackageDefinition,
    // Platform targets
    IPHONEOS_PLATFORM,
    PackageTarget,
    TERMUX_FORMAT,
    TERMUX_PREFIX,
    TargetCheck,
    // Run settings
    Layer,
    Settings,
    SettingsBuilder,
};
pub use template::{TemplateContext, TemplateEngine, TemplateFields};
