//! Architecture tags and per-format platform compatibility.

use crate::bundler::artifact::Artifact;

/// Format name of the Termux flavoured Debian package.
pub const TERMUX_FORMAT: &str = "termux.deb";

/// Install root prefix inside a Termux environment.
pub const TERMUX_PREFIX: &str = "/data/data/com.termux/files";

/// Platform tag used for iOS Debian packages.
pub const IPHONEOS_PLATFORM: &str = "iphoneos-arm64";

/// Architectures Termux ships packages for, matched as prefixes of the
/// unique arch key.
const TERMUX_ARCHES: [&str; 3] = ["amd64", "arm64", "386"];

/// Go-style architecture names translated to Termux names.
const TERMUX_ALIASES: [(&str, &str); 3] = [("386", "i686"), ("amd64", "x86_64"), ("arm64", "aarch64")];

/// Resolved platform tags for one (format, platform group) task.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackageTarget {
    /// Architecture handed to the packager (`arch + arm + mips`).
    pub info_arch: String,
    /// Architecture key including the AMD64 level, unique per output.
    pub unique_arch: String,
    /// Platform tag (`linux`, or the iOS tag).
    pub platform: String,
    /// Prefix prepended to the install directory.
    pub root_prefix: Option<&'static str>,
}

/// Outcome of checking a format against a binary's platform.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TargetCheck {
    /// The combination can be packaged.
    Supported(PackageTarget),
    /// The combination is skipped, with the reason.
    Unsupported(String),
}

impl PackageTarget {
    /// Resolves the target for `format` from the group's reference binary.
    pub fn resolve(reference: &Artifact, format: &str) -> TargetCheck {
        let mut info_arch = format!("{}{}{}", reference.arch, reference.arm, reference.mips);
        let mut unique_arch = format!("{}{}", info_arch, reference.amd64);
        let mut platform = reference.os.clone();
        let mut root_prefix = None;

        if platform == "ios" {
            if format != "deb" {
                return TargetCheck::Unsupported(format!(
                    "{format} packages are not supported for ios"
                ));
            }
            platform = IPHONEOS_PLATFORM.to_string();
        }

        if format == TERMUX_FORMAT {
            if !is_supported_termux_arch(&unique_arch) {
                return TargetCheck::Unsupported(format!(
                    "{unique_arch} is not supported by termux"
                ));
            }
            info_arch = termux_arch(&info_arch);
            unique_arch = termux_arch(&unique_arch);
            root_prefix = Some(TERMUX_PREFIX);
        }

        TargetCheck::Supported(Self {
            info_arch,
            unique_arch,
            platform,
            root_prefix,
        })
    }

    /// Applies the root prefix, if any, to an install directory.
    pub fn install_root(&self, bindir: &str) -> String {
        match self.root_prefix {
            Some(prefix) => format!("{}/{}", prefix, bindir.trim_start_matches('/')),
            None => bindir.to_string(),
        }
    }
}

fn is_supported_termux_arch(arch: &str) -> bool {
    TERMUX_ARCHES.iter().any(|a| arch.starts_with(a))
}

fn termux_arch(arch: &str) -> String {
    TERMUX_ALIASES
        .iter()
        .fold(arch.to_string(), |acc, (from, to)| acc.replace(from, to))
}
