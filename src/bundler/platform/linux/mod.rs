//! Built-in Linux packagers and the content expansion they share.

pub mod debian;

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::{ContentEntry, ContentType},
};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

/// A content entry resolved to concrete filesystem objects.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolvedEntry {
    /// Regular file read from `source`.
    File {
        /// File on the build machine.
        source: PathBuf,
        /// Relative archive path (no leading `/`).
        destination: String,
        /// Permission bits.
        mode: u32,
        /// Marked as a configuration file.
        config: bool,
        /// Owner and group names.
        owner: (String, String),
    },
    /// Directory entry.
    Dir {
        /// Relative archive path.
        destination: String,
        /// Permission bits.
        mode: u32,
    },
    /// Symbolic link.
    Symlink {
        /// Relative archive path.
        destination: String,
        /// Link target.
        target: String,
    },
}

impl ResolvedEntry {
    /// Relative archive path of the entry.
    pub fn destination(&self) -> &str {
        match self {
            Self::File { destination, .. }
            | Self::Dir { destination, .. }
            | Self::Symlink { destination, .. } => destination,
        }
    }
}

/// Resolves the entries applying to `packager`, expanding glob sources and
/// source directories into their files.
///
/// Two entries resolving to the same archive path are a content collision.
pub fn resolve_contents(contents: &[ContentEntry], packager: &str) -> Result<Vec<ResolvedEntry>> {
    let mut resolved = Vec::new();

    for entry in contents.iter().filter(|c| c.applies_to(packager)) {
        let destination = archive_path(&entry.destination);
        match entry.kind {
            ContentType::Dir => resolved.push(ResolvedEntry::Dir {
                destination,
                mode: entry.file_info.mode.unwrap_or(0o755),
            }),
            ContentType::Symlink => resolved.push(ResolvedEntry::Symlink {
                destination,
                target: entry.source.clone(),
            }),
            ContentType::File | ContentType::Config | ContentType::ConfigNoReplace => {
                resolve_files(entry, &destination, &mut resolved)?
            }
        }
    }

    let mut seen = HashSet::new();
    for entry in &resolved {
        if !seen.insert(entry.destination()) {
            return Err(Error::GenericError(format!(
                "content collision: {} is added more than once",
                entry.destination()
            )));
        }
    }

    Ok(resolved)
}

fn resolve_files(entry: &ContentEntry, destination: &str, out: &mut Vec<ResolvedEntry>) -> Result<()> {
    let sources: Vec<PathBuf> = if is_glob(&entry.source) {
        let matches = glob::glob(&entry.source)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::GenericError(format!("glob failed: {}: {e}", entry.source)))?;
        if matches.is_empty() {
            return Err(Error::GenericError(format!(
                "glob failed: {}: no matching files",
                entry.source
            )));
        }
        matches
    } else {
        vec![PathBuf::from(&entry.source)]
    };
    let many = sources.len() > 1;

    for source in sources {
        let metadata = std::fs::metadata(&source).fs_context("reading content source", &source)?;
        if metadata.is_dir() {
            let base = if many {
                join_archive(destination, &file_name(&source))
            } else {
                destination.to_string()
            };
            for walked in walkdir::WalkDir::new(&source).sort_by_file_name() {
                let walked = walked?;
                if !walked.file_type().is_file() {
                    continue;
                }
                let rel = walked
                    .path()
                    .strip_prefix(&source)
                    .map_err(|e| Error::GenericError(e.to_string()))?;
                out.push(file_entry(
                    entry,
                    walked.path().to_path_buf(),
                    join_archive(&base, &rel.to_string_lossy()),
                )?);
            }
        } else {
            let dest = if many || entry.destination.ends_with('/') {
                join_archive(destination, &file_name(&source))
            } else {
                destination.to_string()
            };
            out.push(file_entry(entry, source, dest)?);
        }
    }

    Ok(())
}

fn file_entry(entry: &ContentEntry, source: PathBuf, destination: String) -> Result<ResolvedEntry> {
    let mode = match entry.file_info.mode {
        Some(mode) => mode,
        None => source_mode(&source)?,
    };
    Ok(ResolvedEntry::File {
        source,
        destination,
        mode,
        config: entry.kind.is_config(),
        owner: (
            non_empty_or(&entry.file_info.owner, "root"),
            non_empty_or(&entry.file_info.group, "root"),
        ),
    })
}

#[cfg(unix)]
fn source_mode(path: &Path) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = std::fs::metadata(path).fs_context("reading file mode", path)?;
    Ok(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn source_mode(_path: &Path) -> Result<u32> {
    Ok(0o644)
}

fn is_glob(source: &str) -> bool {
    source.contains(['*', '?', '['])
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Normalizes an install path to a relative archive path.
pub fn archive_path(destination: &str) -> String {
    destination
        .trim_start_matches("./")
        .trim_start_matches('/')
        .trim_end_matches('/')
        .to_string()
}

fn join_archive(base: &str, name: &str) -> String {
    let name = name.replace('\\', "/");
    if base.is_empty() {
        name
    } else {
        format!("{}/{}", base.trim_end_matches('/'), name)
    }
}
