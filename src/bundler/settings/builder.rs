//! Builder for constructing Settings.

use super::Settings;
use chrono::{DateTime, TimeZone, Utc};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_linux::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_linux::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_name("myapp")
///     .version("1.2.3")
///     .dist("dist")
///     .env(std::env::vars().collect())
///     .skip_sign(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_name: Option<String>,
    version: Option<String>,
    dist: Option<PathBuf>,
    parallelism: Option<usize>,
    skip_sign: bool,
    keep_going: bool,
    env: HashMap<String, String>,
    date: Option<DateTime<Utc>>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project name.
    ///
    /// # Required
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Sets the version being packaged.
    ///
    /// # Required
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the output directory.
    ///
    /// Default: `dist`
    pub fn dist<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the maximum number of concurrent packaging tasks.
    ///
    /// Default: number of logical CPUs
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Clears signature settings on every package when set.
    pub fn skip_sign(mut self, skip: bool) -> Self {
        self.skip_sign = skip;
        self
    }

    /// Continues with remaining definitions after a failure when set.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Sets the environment used for passphrases and templates.
    ///
    /// Default: empty
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Sets the build date.
    ///
    /// Default: `SOURCE_DATE_EPOCH` from the environment, otherwise now
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `project_name` or `version` is missing.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let date = match self.date {
            Some(date) => date,
            None => source_date_epoch(&self.env).unwrap_or_else(Utc::now),
        };

        Ok(Settings::new(
            self.project_name.context("project_name is required")?,
            self.version.context("version is required")?,
            self.dist.unwrap_or_else(|| PathBuf::from("dist")),
            self.parallelism.unwrap_or_else(num_cpus::get),
            self.skip_sign,
            self.keep_going,
            self.env,
            date,
        ))
    }
}

fn source_date_epoch(env: &HashMap<String, String>) -> Option<DateTime<Utc>> {
    let secs = env.get("SOURCE_DATE_EPOCH")?.trim().parse::<i64>().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}
