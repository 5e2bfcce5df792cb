//! Core Settings struct and implementations.

use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Run-wide settings shared by every packaging task.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder).
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_linux::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_linux::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_name("myapp")
///     .version("1.0.0")
///     .dist("dist")
///     .parallelism(4)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Project name, used as the default package name.
    project_name: String,

    /// Version being released.
    version: String,

    /// Output directory for packages and generated files.
    dist: PathBuf,

    /// Maximum number of packaging tasks running at once.
    parallelism: usize,

    /// Clears signature settings from every package.
    skip_sign: bool,

    /// Keeps packaging remaining definitions after one fails.
    keep_going: bool,

    /// Environment used for passphrases and the `Env` template field.
    env: HashMap<String, String>,

    /// Build date, also the default mtime of packaged files.
    date: DateTime<Utc>,
}

impl Settings {
    /// Returns the project name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Returns the version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the output directory.
    pub fn dist(&self) -> &Path {
        &self.dist
    }

    /// Returns the parallelism budget (always at least 1).
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Returns true when signing is skipped.
    pub fn skip_sign(&self) -> bool {
        self.skip_sign
    }

    /// Returns true when a failing definition does not stop the run.
    pub fn keep_going(&self) -> bool {
        self.keep_going
    }

    /// Returns the environment map.
    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Returns the build date.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        project_name: String,
        version: String,
        dist: PathBuf,
        parallelism: usize,
        skip_sign: bool,
        keep_going: bool,
        env: HashMap<String, String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            project_name,
            version,
            dist,
            parallelism: parallelism.max(1),
            skip_sign,
            keep_going,
            env,
            date,
        }
    }
}
