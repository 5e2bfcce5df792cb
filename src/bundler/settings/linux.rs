//! Linux format-specific settings.
//!
//! Each block mirrors one packager's extension fields. All fields default to
//! empty so the same structs serve as shared configuration and as sparse
//! per-format overrides.

use super::overrides::impl_layer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle scripts common to all packagers (paths on the build machine).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scripts {
    /// Run before installation.
    #[serde(rename = "preinstall")]
    pub pre_install: String,
    /// Run after installation.
    #[serde(rename = "postinstall")]
    pub post_install: String,
    /// Run before removal.
    #[serde(rename = "preremove")]
    pub pre_remove: String,
    /// Run after removal.
    #[serde(rename = "postremove")]
    pub post_remove: String,
}

impl_layer!(Scripts {
    pre_install,
    post_install,
    pre_remove,
    post_remove,
});

/// Debian-only maintainer scripts.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebScripts {
    /// debian/rules file.
    pub rules: String,
    /// debconf templates file.
    pub templates: String,
}

impl_layer!(DebScripts { rules, templates });

/// dpkg trigger declarations.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebTriggers {
    /// `interest` triggers.
    pub interest: Vec<String>,
    /// `interest-await` triggers.
    pub interest_await: Vec<String>,
    /// `interest-noawait` triggers.
    pub interest_noawait: Vec<String>,
    /// `activate` triggers.
    pub activate: Vec<String>,
    /// `activate-await` triggers.
    pub activate_await: Vec<String>,
    /// `activate-noawait` triggers.
    pub activate_noawait: Vec<String>,
}

impl DebTriggers {
    /// Returns true when no trigger is declared.
    pub fn is_empty(&self) -> bool {
        self.interest.is_empty()
            && self.interest_await.is_empty()
            && self.interest_noawait.is_empty()
            && self.activate.is_empty()
            && self.activate_await.is_empty()
            && self.activate_noawait.is_empty()
    }
}

impl_layer!(DebTriggers {
    interest,
    interest_await,
    interest_noawait,
    activate,
    activate_await,
    activate_noawait,
});

/// Debian package signature settings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebSignatureSettings {
    /// Path to the signing key (templated).
    pub key_file: String,
    /// dpkg-sig role, e.g. `origin`, `maint` or `archive`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl_layer!(DebSignatureSettings { key_file, kind });

/// Debian package (.deb) configuration.
///
/// ```toml
/// [nfpms.deb]
/// breaks = ["oldpkg (<< 2.0)"]
/// lintian_overrides = ["statically-linked-binary"]
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebSettings {
    /// Extra maintainer scripts.
    pub scripts: DebScripts,
    /// dpkg triggers.
    pub triggers: DebTriggers,
    /// Packages this one breaks.
    pub breaks: Vec<String>,
    /// Signature settings.
    pub signature: DebSignatureSettings,
    /// Lintian override lines, without the package-name prefix.
    pub lintian_overrides: Vec<String>,
    /// Data archive compression: `gzip`, `xz`, `zstd` or `none`.
    pub compression: String,
    /// Extra control file fields.
    pub fields: BTreeMap<String, String>,
}

impl_layer!(DebSettings {
    scripts,
    triggers,
    breaks,
    signature,
    lintian_overrides,
    compression,
    fields,
});

/// RPM transaction scripts.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpmScripts {
    /// `%pretrans` script.
    #[serde(rename = "pretrans")]
    pub pre_trans: String,
    /// `%posttrans` script.
    #[serde(rename = "posttrans")]
    pub post_trans: String,
}

impl_layer!(RpmScripts {
    pre_trans,
    post_trans,
});

/// Signature settings shared by RPM packages.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureSettings {
    /// Path to the signing key (templated).
    pub key_file: String,
}

impl_layer!(SignatureSettings { key_file });

/// RPM package (.rpm) configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpmSettings {
    /// One-line summary; defaults to the first description line downstream.
    pub summary: String,
    /// RPM group.
    pub group: String,
    /// Payload compression: `gzip`, `xz`, `zstd` or `lzma`.
    pub compression: String,
    /// Signature settings.
    pub signature: SignatureSettings,
    /// Transaction scripts.
    pub scripts: RpmScripts,
}

impl_layer!(RpmSettings {
    summary,
    group,
    compression,
    signature,
    scripts,
});

/// Upgrade scripts used by apk and archlinux packages.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeScripts {
    /// Run before upgrade.
    #[serde(rename = "preupgrade")]
    pub pre_upgrade: String,
    /// Run after upgrade.
    #[serde(rename = "postupgrade")]
    pub post_upgrade: String,
}

impl_layer!(UpgradeScripts {
    pre_upgrade,
    post_upgrade,
});

/// Alpine signature settings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApkSignatureSettings {
    /// Path to the RSA signing key (templated).
    pub key_file: String,
    /// Key name embedded in the signature file name (templated).
    pub key_name: String,
}

impl_layer!(ApkSignatureSettings { key_file, key_name });

/// Alpine package (.apk) configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApkSettings {
    /// Signature settings.
    pub signature: ApkSignatureSettings,
    /// Upgrade scripts.
    pub scripts: UpgradeScripts,
}

impl_layer!(ApkSettings { signature, scripts });

/// Arch Linux package (.pkg.tar.zst) configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchLinuxSettings {
    /// Base package name for split packages.
    pub pkgbase: String,
    /// Packager identity.
    pub packager: String,
    /// Upgrade scripts.
    pub scripts: UpgradeScripts,
}

impl_layer!(ArchLinuxSettings {
    pkgbase,
    packager,
    scripts,
});
