//! Shared artifact store.
//!
//! The store holds every artifact produced by earlier release stages
//! (binaries, archives) and receives the Linux packages built here. Reads take
//! snapshots; appends are serialized behind a mutex so packaging tasks can
//! record results concurrently.

use crate::bundler::settings::ContentEntry;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Kind of artifact held by the store.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Compiled executable.
    #[default]
    Binary,
    /// Native Linux package built by this crate.
    LinuxPackage,
    /// Archive of binaries.
    Archive,
    /// Checksums file.
    Checksum,
    /// Anything else produced upstream.
    Other,
}

/// Extra data attached to an artifact.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactExtra {
    /// Build ID for binaries; package definition ID for packages.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Package format.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,

    /// Binaries a package was built from.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub builds: Vec<Artifact>,

    /// Content entries of a package.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<ContentEntry>,

    /// SHA-256 of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// One file produced by the release pipeline.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Logical name (binary name or package file name).
    pub name: String,

    /// Path on disk.
    pub path: PathBuf,

    /// Artifact kind.
    #[serde(rename = "type")]
    pub kind: ArtifactKind,

    /// Target operating system (`linux`, `ios`, ...).
    #[serde(default)]
    pub os: String,

    /// Target architecture (`amd64`, `arm64`, `arm`, ...).
    #[serde(default)]
    pub arch: String,

    /// ARM revision (`6`, `7`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arm: String,

    /// MIPS float variant (`hardfloat`, `softfloat`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mips: String,

    /// AMD64 microarchitecture level (`v1`..`v4`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub amd64: String,

    /// Extra data.
    #[serde(default)]
    pub extra: ArtifactExtra,
}

/// Grouping key for binaries built for the same platform.
///
/// The AMD64 level is not part of the key.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PlatformKey {
    /// Operating system.
    pub os: String,
    /// Architecture.
    pub arch: String,
    /// ARM revision.
    pub arm: String,
    /// MIPS variant.
    pub mips: String,
}

impl PlatformKey {
    /// Key of `artifact`.
    pub fn of(artifact: &Artifact) -> Self {
        Self {
            os: artifact.os.clone(),
            arch: artifact.arch.clone(),
            arm: artifact.arm.clone(),
            mips: artifact.mips.clone(),
        }
    }
}

impl std::fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}{}{}", self.os, self.arch, self.arm, self.mips)
    }
}

/// Binaries sharing one [`PlatformKey`], packaged together.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformGroup {
    /// Shared platform key.
    pub key: PlatformKey,
    /// Binaries in the group; never empty.
    pub binaries: Vec<Artifact>,
}

impl PlatformGroup {
    /// First binary of the group, used for platform and template fields.
    pub fn reference(&self) -> &Artifact {
        &self.binaries[0]
    }
}

/// Groups artifacts by platform, in key order.
pub fn group_by_platform(artifacts: Vec<Artifact>) -> Vec<PlatformGroup> {
    let mut groups: BTreeMap<PlatformKey, Vec<Artifact>> = BTreeMap::new();
    for artifact in artifacts {
        groups
            .entry(PlatformKey::of(&artifact))
            .or_default()
            .push(artifact);
    }
    groups
        .into_iter()
        .map(|(key, binaries)| PlatformGroup { key, binaries })
        .collect()
}

/// Thread-safe artifact list.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    items: Mutex<Vec<Artifact>>,
}

impl ArtifactStore {
    /// Creates a store holding `artifacts`.
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self {
            items: Mutex::new(artifacts),
        }
    }

    /// Appends one artifact.
    pub fn add(&self, artifact: Artifact) {
        log::debug!("added new artifact {} ({:?})", artifact.name, artifact.kind);
        self.lock().push(artifact);
    }

    /// Snapshot of artifacts matching `predicate`, in insertion order.
    pub fn filter<F>(&self, predicate: F) -> Vec<Artifact>
    where
        F: Fn(&Artifact) -> bool,
    {
        self.lock().iter().filter(|a| predicate(a)).cloned().collect()
    }

    /// Snapshot of every artifact.
    pub fn list(&self) -> Vec<Artifact> {
        self.lock().clone()
    }

    /// Number of artifacts held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if the store holds no artifacts.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Artifact>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
