//! Package definitions and their per-format overrides.

use super::{
    ApkSettings, ArchLinuxSettings, ContentEntry, DebSettings, RpmSettings, Scripts,
    overrides::{impl_layer, merge_layered},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default output file name template.
///
/// Renders as `<package>_<version>_<os>_<arch>` with the ARM revision, MIPS
/// variant and non-baseline AMD64 level appended.
pub const DEFAULT_FILE_NAME_TEMPLATE: &str = concat!(
    "{{PackageName}}_{{Version}}_{{Os}}_{{Arch}}",
    "{{#if Arm}}v{{Arm}}{{/if}}",
    "{{#if Mips}}_{{Mips}}{{/if}}",
    "{{#if (ne Amd64 \"v1\")}}{{Amd64}}{{/if}}",
);

/// Default install directory for binaries.
pub const DEFAULT_BINDIR: &str = "/usr/bin";

/// Default package definition identifier.
pub const DEFAULT_ID: &str = "default";

/// Fields a format-specific override may replace.
///
/// Empty values mean "not set": in an override they leave the shared value in
/// place, see [`PackageDefinition::effective_config`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overridables {
    /// Output file name template (templated).
    pub file_name_template: String,
    /// Package name; defaults to the project name.
    pub package_name: String,
    /// Version epoch.
    pub epoch: String,
    /// Package release.
    pub release: String,
    /// Prerelease suffix.
    pub prerelease: String,
    /// Version metadata suffix.
    pub version_metadata: String,
    /// Maintainer, `Name <email>` (templated).
    pub maintainer: String,
    /// Package description (templated).
    pub description: String,
    /// Homepage URL (templated).
    pub homepage: String,
    /// Hard dependencies.
    pub dependencies: Vec<String>,
    /// Recommended packages.
    pub recommends: Vec<String>,
    /// Suggested packages.
    pub suggests: Vec<String>,
    /// Conflicting packages.
    pub conflicts: Vec<String>,
    /// Packages this one replaces.
    pub replaces: Vec<String>,
    /// Virtual packages this one provides.
    pub provides: Vec<String>,
    /// Extra files; source and destination are templated.
    pub contents: Vec<ContentEntry>,
    /// Lifecycle scripts.
    pub scripts: Scripts,
    /// Debian-specific settings.
    pub deb: DebSettings,
    /// RPM-specific settings.
    pub rpm: RpmSettings,
    /// Alpine-specific settings.
    pub apk: ApkSettings,
    /// Arch Linux-specific settings.
    pub archlinux: ArchLinuxSettings,
}

impl_layer!(Overridables {
    file_name_template,
    package_name,
    epoch,
    release,
    prerelease,
    version_metadata,
    maintainer,
    description,
    homepage,
    dependencies,
    recommends,
    suggests,
    conflicts,
    replaces,
    provides,
    contents,
    scripts,
    deb,
    rpm,
    apk,
    archlinux,
});

/// One user-declared packaging unit.
///
/// ```toml
/// [[nfpms]]
/// id = "cli"
/// formats = ["deb", "rpm"]
/// builds = ["cli"]
/// maintainer = "Jane Doe <jane@example.com>"
///
/// [nfpms.overrides.rpm]
/// dependencies = ["glibc"]
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageDefinition {
    /// Unique identifier, used in passphrase variables and artifact records.
    pub id: String,
    /// Build IDs whose binaries belong to this package; empty selects all.
    pub builds: Vec<String>,
    /// Formats to produce (`deb`, `rpm`, `apk`, `archlinux`, `termux.deb`).
    pub formats: Vec<String>,
    /// Install directory for binaries (templated).
    pub bindir: String,
    /// Metadata-only package: binaries are not included.
    pub meta: bool,
    /// Debian section.
    pub section: String,
    /// Debian priority.
    pub priority: String,
    /// Vendor.
    pub vendor: String,
    /// License identifier.
    pub license: String,
    /// Changelog file path.
    pub changelog: String,
    /// Shared, overridable fields.
    #[serde(flatten)]
    pub overridables: Overridables,
    /// Per-format overrides keyed by format name.
    pub overrides: BTreeMap<String, Overridables>,
}

impl PackageDefinition {
    /// Effective configuration for `format`: the format override layered on
    /// the shared fields. A missing override yields the shared fields.
    pub fn effective_config(&self, format: &str) -> Overridables {
        merge_layered(&self.overridables, self.overrides.get(format))
    }

    /// Fills unset fields with their defaults.
    pub fn apply_defaults(&mut self, project_name: &str) {
        if self.id.is_empty() {
            self.id = DEFAULT_ID.to_string();
        }
        if self.bindir.is_empty() {
            self.bindir = DEFAULT_BINDIR.to_string();
        }
        if self.overridables.package_name.is_empty() {
            self.overridables.package_name = project_name.to_string();
        }
        if self.overridables.file_name_template.is_empty() {
            self.overridables.file_name_template = DEFAULT_FILE_NAME_TEMPLATE.to_string();
        }
        if self.overridables.maintainer.is_empty() {
            log::warn!(
                "nfpms.maintainer should always be set (package definition {:?})",
                self.id
            );
        }
    }

    /// Package name from the shared fields.
    pub fn package_name(&self) -> &str {
        &self.overridables.package_name
    }
}
