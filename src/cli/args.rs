//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// Linux package builder for release pipelines
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_linux",
    about = "Builds Linux packages (.deb, .termux.deb) from compiled binaries",
    long_about = "Builds native Linux packages from the binaries listed in an artifact manifest.

Reads [[nfpms]] package definitions from a TOML config, packages every matching
binary per format, and appends the produced packages to the manifest.

Usage:
  kodegen_bundler_linux --config release.toml --artifacts dist/artifacts.json --version 1.2.3
  kodegen_bundler_linux -c release.toml -a dist/artifacts.json --version 1.2.3 --skip-sign -p 4

Built-in formats: deb, termux.deb. Other formats (rpm, apk, archlinux) need a
packager registered through the library's PackagerRegistry; the CLI rejects them
as unknown formats.

Signing passphrases are read from NFPM_<ID>_<FORMAT>_PASSPHRASE or NFPM_<ID>_PASSPHRASE."
)]
pub struct Args {
    /// Pipeline configuration file
    #[arg(short, long, value_name = "PATH", default_value = "release.toml")]
    pub config: PathBuf,

    /// Artifact manifest (JSON) to read binaries from and append packages to
    #[arg(short, long, value_name = "PATH", default_value = "dist/artifacts.json")]
    pub artifacts: PathBuf,

    /// Version being released
    #[arg(long, value_name = "VERSION", env = "VERSION")]
    pub version: Option<String>,

    /// Maximum number of packages built at once (defaults to the CPU count)
    #[arg(short, long, value_name = "N")]
    pub parallelism: Option<usize>,

    /// Build packages without signatures
    #[arg(long)]
    pub skip_sign: bool,

    /// Keep packaging remaining definitions after one fails
    #[arg(long)]
    pub keep_going: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.parallelism == Some(0) {
            return Err("--parallelism must be at least 1".to_string());
        }
        if self.version.as_deref().is_some_and(str::is_empty) {
            return Err("--version cannot be empty".to_string());
        }
        Ok(())
    }
}
