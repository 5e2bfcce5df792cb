//! Format-agnostic package descriptor handed to packagers.

use crate::bundler::settings::{ContentEntry, DebScripts, DebTriggers, RpmScripts, Scripts, UpgradeScripts};
use chrono::{DateTime, Utc};

/// Key material shared by every signature block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PackageSignature {
    /// Path to the signing key.
    pub key_file: String,
    /// Passphrase unlocking the key; empty when none was provided.
    pub key_passphrase: String,
}

/// Debian signature block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DebSignature {
    /// Key material.
    pub signature: PackageSignature,
    /// dpkg-sig role.
    pub kind: String,
}

/// RPM signature block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RpmSignature {
    /// Key material.
    pub signature: PackageSignature,
}

/// Alpine signature block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ApkSignature {
    /// Key material.
    pub signature: PackageSignature,
    /// Key name used in the signature file name.
    pub key_name: String,
}

/// Debian extension fields.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DebInfo {
    /// Extra maintainer scripts.
    pub scripts: DebScripts,
    /// dpkg triggers.
    pub triggers: DebTriggers,
    /// Packages this one breaks.
    pub breaks: Vec<String>,
    /// Data archive compression.
    pub compression: String,
    /// Extra control fields.
    pub fields: Vec<(String, String)>,
    /// Signature block.
    pub signature: DebSignature,
}

/// RPM extension fields.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RpmInfo {
    /// Summary line.
    pub summary: String,
    /// RPM group.
    pub group: String,
    /// Payload compression.
    pub compression: String,
    /// Transaction scripts.
    pub scripts: RpmScripts,
    /// Signature block.
    pub signature: RpmSignature,
}

/// Alpine extension fields.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ApkInfo {
    /// Upgrade scripts.
    pub scripts: UpgradeScripts,
    /// Signature block.
    pub signature: ApkSignature,
}

/// Arch Linux extension fields.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ArchLinuxInfo {
    /// Base package name.
    pub pkgbase: String,
    /// Packager identity.
    pub packager: String,
    /// Upgrade scripts.
    pub scripts: UpgradeScripts,
}

/// Fully resolved description of one package to build.
///
/// Every templated field has already been expanded; packagers only encode.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PackageInfo {
    /// Package name.
    pub name: String,
    /// Architecture tag (Go-style, e.g. `amd64`, `arm7`).
    pub arch: String,
    /// Platform tag (`linux`, `iphoneos-arm64`).
    pub platform: String,
    /// Upstream version.
    pub version: String,
    /// Version epoch.
    pub epoch: String,
    /// Package release.
    pub release: String,
    /// Prerelease suffix.
    pub prerelease: String,
    /// Version metadata.
    pub version_metadata: String,
    /// Debian section.
    pub section: String,
    /// Debian priority.
    pub priority: String,
    /// Maintainer.
    pub maintainer: String,
    /// Description.
    pub description: String,
    /// Vendor.
    pub vendor: String,
    /// Homepage URL.
    pub homepage: String,
    /// License.
    pub license: String,
    /// Changelog path.
    pub changelog: String,
    /// Hard dependencies.
    pub depends: Vec<String>,
    /// Recommended packages.
    pub recommends: Vec<String>,
    /// Suggested packages.
    pub suggests: Vec<String>,
    /// Conflicting packages.
    pub conflicts: Vec<String>,
    /// Replaced packages.
    pub replaces: Vec<String>,
    /// Provided virtual packages.
    pub provides: Vec<String>,
    /// Ordered content entries.
    pub contents: Vec<ContentEntry>,
    /// Lifecycle scripts.
    pub scripts: Scripts,
    /// Debian fields.
    pub deb: DebInfo,
    /// RPM fields.
    pub rpm: RpmInfo,
    /// Alpine fields.
    pub apk: ApkInfo,
    /// Arch Linux fields.
    pub archlinux: ArchLinuxInfo,
    /// Modification time applied to archive entries.
    pub mtime: DateTime<Utc>,
}

impl PackageInfo {
    /// Fills fields packagers rely on being present.
    pub fn with_defaults(mut self) -> Self {
        if self.platform.is_empty() {
            self.platform = "linux".to_string();
        }
        if self.arch.is_empty() {
            self.arch = "amd64".to_string();
        }
        if self.version.is_empty() {
            self.version = "0.0.0".to_string();
        }
        if self.description.is_empty() {
            self.description = "no description given".to_string();
        }
        if self.priority.is_empty() {
            self.priority = "optional".to_string();
        }
        if self.rpm.summary.is_empty() {
            self.rpm.summary = self
                .description
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
        }
        self
    }

    /// Clears every signature block.
    pub fn clear_signatures(&mut self) {
        self.deb.signature = DebSignature::default();
        self.rpm.signature = RpmSignature::default();
        self.apk.signature = ApkSignature::default();
    }
}
