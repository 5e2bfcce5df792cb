//! Debian package (.deb) packager.
//!
//! Produces an `ar` archive holding:
//!
//! 1. `debian-binary` - format version `2.0`
//! 2. `control.tar.gz` - control file, md5sums, conffiles, maintainer scripts
//!    and triggers
//! 3. `data.tar.gz` (or `data.tar`) - the installed file tree
//!
//! Package signing is not performed here.

use super::{ResolvedEntry, resolve_contents};
use crate::{
    bail,
    bundler::{
        error::{ErrorExt, Result},
        platform::{PackageInfo, Packager},
    },
};
use flate2::{Compression, write::GzEncoder};
use std::{collections::BTreeSet, io::Write};

/// Architecture tags that differ in Debian naming.
const ARCH_TO_DEBIAN: [(&str, &str); 8] = [
    ("386", "i386"),
    ("arm5", "armel"),
    ("arm6", "armhf"),
    ("arm7", "armhf"),
    ("mips64le", "mips64el"),
    ("mipsle", "mipsel"),
    ("ppc64le", "ppc64el"),
    ("s390", "s390x"),
];

/// Built-in `.deb` packager.
#[derive(Clone, Copy, Debug, Default)]
pub struct DebPackager;

impl Packager for DebPackager {
    fn conventional_file_name(&self, info: &PackageInfo) -> String {
        format!(
            "{}_{}_{}.deb",
            info.name,
            upstream_version(info),
            debian_arch(info)
        )
    }

    fn conventional_extension(&self) -> Option<&str> {
        Some(".deb")
    }

    fn package(&self, info: &PackageInfo, writer: &mut dyn Write) -> Result<()> {
        if !info.deb.signature.signature.key_file.is_empty() {
            log::warn!(
                "built-in deb packager does not sign packages; {} is left unsigned",
                info.name
            );
        }

        let mtime = info.mtime.timestamp().max(0) as u64;
        let entries = resolve_contents(&info.contents, "deb")?;
        let data = build_data(&entries, mtime, &info.deb.compression)?;
        let control = build_control(info, &data, mtime)?;

        let mut archive = ar::Builder::new(writer);
        append_ar(&mut archive, "debian-binary", b"2.0\n", mtime)?;
        append_ar(&mut archive, "control.tar.gz", &control, mtime)?;
        append_ar(&mut archive, &data.name, &data.archive, mtime)?;
        Ok(())
    }
}

/// Debian architecture for `info`.
///
/// iOS packages carry their platform tag as the architecture.
pub fn debian_arch(info: &PackageInfo) -> String {
    if info.platform.starts_with("iphoneos") {
        return info.platform.clone();
    }
    ARCH_TO_DEBIAN
        .iter()
        .find(|(go, _)| *go == info.arch)
        .map(|(_, deb)| deb.to_string())
        .unwrap_or_else(|| info.arch.clone())
}

/// Version without epoch: `version[~prerelease][+metadata][-release]`.
pub fn upstream_version(info: &PackageInfo) -> String {
    let mut version = info.version.clone();
    if !info.prerelease.is_empty() {
        version.push('~');
        version.push_str(&info.prerelease);
    }
    if !info.version_metadata.is_empty() {
        version.push('+');
        version.push_str(&info.version_metadata);
    }
    if !info.release.is_empty() {
        version.push('-');
        version.push_str(&info.release);
    }
    version
}

fn full_version(info: &PackageInfo) -> String {
    if info.epoch.is_empty() {
        upstream_version(info)
    } else {
        format!("{}:{}", info.epoch, upstream_version(info))
    }
}

struct DataArchive {
    name: String,
    archive: Vec<u8>,
    md5sums: String,
    conffiles: String,
    installed_size: u64,
}

fn build_data(entries: &[ResolvedEntry], mtime: u64, compression: &str) -> Result<DataArchive> {
    let mut tar = tar::Builder::new(Vec::new());
    let mut dirs = BTreeSet::new();
    let mut md5sums = String::new();
    let mut conffiles = String::new();
    let mut installed_size = 0u64;

    for entry in entries {
        ensure_parents(&mut tar, &mut dirs, entry.destination(), mtime)?;
        match entry {
            ResolvedEntry::Dir { destination, mode } => {
                if dirs.insert(destination.clone()) {
                    append_dir(&mut tar, destination, *mode, mtime)?;
                }
            }
            ResolvedEntry::Symlink {
                destination,
                target,
            } => {
                let mut header = header(tar::EntryType::Symlink, 0o777, mtime);
                tar.append_link(&mut header, destination, target)?;
            }
            ResolvedEntry::File {
                source,
                destination,
                mode,
                config,
                owner,
            } => {
                let data = std::fs::read(source).fs_context("reading package file", source)?;
                let mut header = header(tar::EntryType::Regular, *mode, mtime);
                header.set_size(data.len() as u64);
                header.set_username(&owner.0)?;
                header.set_groupname(&owner.1)?;
                tar.append_data(&mut header, destination, data.as_slice())?;

                md5sums.push_str(&format!("{:x}  {}\n", md5::compute(&data), destination));
                if *config {
                    conffiles.push_str(&format!("/{destination}\n"));
                }
                installed_size += data.len() as u64;
            }
        }
    }

    let tar = tar.into_inner()?;
    let (name, archive) = match compression {
        "" | "gzip" => ("data.tar.gz", gzip(&tar)?),
        "none" => ("data.tar", tar),
        other => bail!("compression {other:?} is not supported by the built-in deb packager"),
    };

    Ok(DataArchive {
        name: name.to_string(),
        archive,
        md5sums,
        conffiles,
        installed_size: installed_size.div_ceil(1024),
    })
}

fn build_control(info: &PackageInfo, data: &DataArchive, mtime: u64) -> Result<Vec<u8>> {
    let mut tar = tar::Builder::new(Vec::new());

    append_control_file(&mut tar, "control", control_file(info, data.installed_size).as_bytes(), 0o644, mtime)?;
    append_control_file(&mut tar, "md5sums", data.md5sums.as_bytes(), 0o644, mtime)?;
    if !data.conffiles.is_empty() {
        append_control_file(&mut tar, "conffiles", data.conffiles.as_bytes(), 0o644, mtime)?;
    }

    let scripts = [
        ("preinst", &info.scripts.pre_install, 0o755),
        ("postinst", &info.scripts.post_install, 0o755),
        ("prerm", &info.scripts.pre_remove, 0o755),
        ("postrm", &info.scripts.post_remove, 0o755),
        ("rules", &info.deb.scripts.rules, 0o755),
        ("templates", &info.deb.scripts.templates, 0o644),
    ];
    for (name, path, mode) in scripts {
        if path.is_empty() {
            continue;
        }
        let body = std::fs::read(path).fs_context("reading maintainer script", path)?;
        append_control_file(&mut tar, name, &body, mode, mtime)?;
    }

    if !info.deb.triggers.is_empty() {
        append_control_file(&mut tar, "triggers", triggers_file(info).as_bytes(), 0o644, mtime)?;
    }

    gzip(&tar.into_inner()?)
}

fn control_file(info: &PackageInfo, installed_size: u64) -> String {
    let mut control = String::new();
    let mut field = |name: &str, value: &str| {
        if !value.is_empty() {
            control.push_str(&format!("{name}: {value}\n"));
        }
    };

    field("Package", &info.name);
    field("Version", &full_version(info));
    field("Section", &info.section);
    field("Priority", &info.priority);
    field("Architecture", &debian_arch(info));
    field("Maintainer", &info.maintainer);
    field("Vendor", &info.vendor);
    field("Installed-Size", &installed_size.to_string());
    field("Depends", &info.depends.join(", "));
    field("Recommends", &info.recommends.join(", "));
    field("Suggests", &info.suggests.join(", "));
    field("Conflicts", &info.conflicts.join(", "));
    field("Breaks", &info.deb.breaks.join(", "));
    field("Replaces", &info.replaces.join(", "));
    field("Provides", &info.provides.join(", "));
    field("Homepage", &info.homepage);
    for (name, value) in &info.deb.fields {
        field(name, value);
    }

    let mut lines = info.description.trim().lines();
    control.push_str(&format!("Description: {}\n", lines.next().unwrap_or_default()));
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() {
            control.push_str(" .\n");
        } else {
            control.push_str(&format!(" {line}\n"));
        }
    }
    control
}

fn triggers_file(info: &PackageInfo) -> String {
    let triggers = &info.deb.triggers;
    let groups = [
        ("interest", &triggers.interest),
        ("interest-await", &triggers.interest_await),
        ("interest-noawait", &triggers.interest_noawait),
        ("activate", &triggers.activate),
        ("activate-await", &triggers.activate_await),
        ("activate-noawait", &triggers.activate_noawait),
    ];
    let mut out = String::new();
    for (directive, names) in groups {
        for name in names {
            out.push_str(&format!("{directive} {name}\n"));
        }
    }
    out
}

fn header(kind: tar::EntryType, mode: u32, mtime: u64) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(kind);
    header.set_mode(mode);
    header.set_mtime(mtime);
    header.set_uid(0);
    header.set_gid(0);
    header.set_size(0);
    header
}

fn ensure_parents(
    tar: &mut tar::Builder<Vec<u8>>,
    dirs: &mut BTreeSet<String>,
    destination: &str,
    mtime: u64,
) -> Result<()> {
    let mut prefix = String::new();
    let components: Vec<&str> = destination.split('/').collect();
    for component in &components[..components.len().saturating_sub(1)] {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(component);
        if dirs.insert(prefix.clone()) {
            append_dir(tar, &prefix, 0o755, mtime)?;
        }
    }
    Ok(())
}

fn append_dir(tar: &mut tar::Builder<Vec<u8>>, path: &str, mode: u32, mtime: u64) -> Result<()> {
    let mut header = header(tar::EntryType::Directory, mode, mtime);
    tar.append_data(&mut header, path, std::io::empty())?;
    Ok(())
}

fn append_control_file(
    tar: &mut tar::Builder<Vec<u8>>,
    name: &str,
    body: &[u8],
    mode: u32,
    mtime: u64,
) -> Result<()> {
    let mut header = header(tar::EntryType::Regular, mode, mtime);
    header.set_size(body.len() as u64);
    tar.append_data(&mut header, name, body)?;
    Ok(())
}

fn append_ar<W: Write>(archive: &mut ar::Builder<W>, name: &str, body: &[u8], mtime: u64) -> Result<()> {
    let mut header = ar::Header::new(name.as_bytes().to_vec(), body.len() as u64);
    header.set_mode(0o100644);
    header.set_mtime(mtime);
    archive.append(&header, body)?;
    Ok(())
}

fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
