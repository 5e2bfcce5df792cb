//! Recording finished packages in the artifact store.

use crate::bundler::{
    artifact::{Artifact, ArtifactExtra, ArtifactKind, ArtifactStore, PlatformGroup},
    settings::ContentEntry,
};
use std::path::PathBuf;

/// A package file written by a backend, ready to be recorded.
#[derive(Clone, Debug)]
pub struct BuiltPackage {
    /// Final file name.
    pub name: String,
    /// Path of the written file.
    pub path: PathBuf,
    /// Owning package definition.
    pub id: String,
    /// Format the package was built for.
    pub format: String,
    /// Contents handed to the backend.
    pub contents: Vec<ContentEntry>,
    /// SHA-256 of the file.
    pub checksum: String,
}

/// Appends a [`ArtifactKind::LinuxPackage`] for `built` to `store` and
/// returns the recorded artifact.
///
/// Platform fields are copied from the group's reference binary.
pub fn record(store: &ArtifactStore, group: &PlatformGroup, built: BuiltPackage) -> Artifact {
    let reference = group.reference();
    let artifact = Artifact {
        name: built.name,
        path: built.path,
        kind: ArtifactKind::LinuxPackage,
        os: reference.os.clone(),
        arch: reference.arch.clone(),
        arm: reference.arm.clone(),
        mips: reference.mips.clone(),
        amd64: reference.amd64.clone(),
        extra: ArtifactExtra {
            id: built.id,
            format: built.format,
            builds: group.binaries.clone(),
            files: built.contents,
            checksum: Some(built.checksum),
        },
    };
    store.add(artifact.clone());
    artifact
}
