//! Package content entries.

use serde::{Deserialize, Serialize};

/// Kind of filesystem object a content entry installs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Regular file (or tree of files when the source is a directory or glob).
    #[default]
    #[serde(alias = "")]
    File,
    /// Empty directory owned by the package.
    Dir,
    /// Symbolic link; `source` is the link target.
    Symlink,
    /// Configuration file preserved on upgrade.
    Config,
    /// Configuration file that is never replaced once installed.
    #[serde(rename = "config|noreplace")]
    ConfigNoReplace,
}

impl ContentType {
    /// Returns true for configuration file types.
    pub fn is_config(self) -> bool {
        matches!(self, Self::Config | Self::ConfigNoReplace)
    }
}

/// Mode and ownership metadata for a content entry.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    /// Unix permission bits. `None` keeps the source file's mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,

    /// Owning user name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner: String,

    /// Owning group name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,

    /// Modification time as Unix seconds. `None` uses the package mtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime: Option<i64>,
}

impl FileInfo {
    /// File info carrying only a permission mode.
    pub fn with_mode(mode: u32) -> Self {
        Self {
            mode: Some(mode),
            ..Default::default()
        }
    }
}

/// One file, directory or link destined for a package.
///
/// ```toml
/// [[nfpms.contents]]
/// src = "LICENSE"
/// dst = "/usr/share/doc/{{PackageName}}/copyright"
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentEntry {
    /// Source path on the build machine, or the link target for symlinks.
    #[serde(rename = "src", alias = "source")]
    pub source: String,

    /// Absolute install path inside the package.
    #[serde(rename = "dst", alias = "destination")]
    pub destination: String,

    /// Entry type.
    #[serde(rename = "type")]
    pub kind: ContentType,

    /// Restricts the entry to one packager (e.g. `deb`); empty means all.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub packager: String,

    /// Mode and ownership.
    #[serde(rename = "file_info")]
    pub file_info: FileInfo,
}

impl ContentEntry {
    /// Returns true if the entry applies to `packager`.
    pub fn applies_to(&self, packager: &str) -> bool {
        self.packager.is_empty() || self.packager == packager
    }
}

/// Destinations of every entry, in order.
pub fn destinations(contents: &[ContentEntry]) -> Vec<&str> {
    contents.iter().map(|c| c.destination.as_str()).collect()
}
