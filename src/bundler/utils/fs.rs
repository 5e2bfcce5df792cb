//! File system utilities for packaging.
//!
//! Thin async wrappers that create missing parent directories and attach the
//! offending path to IO errors.

use crate::bundler::error::{ErrorExt, Result};
use std::path::Path;
use tokio::fs;

/// Creates all of the directories of the specified path.
///
/// Succeeds if the directory already exists.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Writes `contents` to `path`, creating any parent directories as needed.
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).await?;
    }
    fs::write(path, contents)
        .await
        .fs_context("writing file", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_file_creates_parents() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("deb/foo_amd64/.lintian");

        write_file(&path, "foo: bar").await.expect("write");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "foo: bar");
    }

    #[tokio::test]
    async fn create_dir_all_is_idempotent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("dist");
        create_dir_all(&dir).await.expect("first");
        create_dir_all(&dir).await.expect("second");
        assert!(dir.is_dir());
    }
}
