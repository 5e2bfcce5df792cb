//! Shared fixtures for integration tests.

#![allow(dead_code)]

use kodegen_bundler_linux::{
    bail,
    bundler::{
        Artifact, ArtifactKind, ArtifactStore, Bundler, PackageDefinition, PackageInfo, Packager,
        PackagerRegistry, Result, SettingsBuilder,
    },
};
use std::{
    collections::HashMap,
    io::{Read, Write},
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

/// Packager that records every descriptor it receives and tracks how many
/// calls run at once.
#[derive(Clone, Default)]
pub struct MockPackager {
    pub extension: Option<&'static str>,
    pub fail_arch: Option<&'static str>,
    pub delay: Duration,
    pub seen: Arc<Mutex<Vec<PackageInfo>>>,
    pub running: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl MockPackager {
    pub fn with_extension(extension: &'static str) -> Self {
        Self {
            extension: Some(extension),
            ..Default::default()
        }
    }

    pub fn seen(&self) -> Vec<PackageInfo> {
        self.seen.lock().expect("seen lock").clone()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Packager for MockPackager {
    fn conventional_file_name(&self, info: &PackageInfo) -> String {
        format!(
            "{}-{}.{}{}",
            info.name,
            info.version,
            info.arch,
            self.extension.unwrap_or_default()
        )
    }

    fn conventional_extension(&self) -> Option<&str> {
        self.extension
    }

    fn package(&self, info: &PackageInfo, writer: &mut dyn Write) -> Result<()> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.seen.lock().expect("seen lock").push(info.clone());
        self.running.fetch_sub(1, Ordering::SeqCst);

        if self.fail_arch == Some(info.arch.as_str()) {
            bail!("mock failure for {}", info.arch);
        }
        writer.write_all(format!("{} {}\n", info.name, info.arch).as_bytes())?;
        Ok(())
    }
}

/// Writes a fake executable under `dir` and returns its binary artifact.
pub fn binary(dir: &Path, os: &str, arch: &str, arm: &str) -> Artifact {
    let folder = dir.join(format!("foo_{os}_{arch}{arm}"));
    std::fs::create_dir_all(&folder).expect("binary dir");
    let path = folder.join("foo");
    std::fs::write(&path, b"#!/bin/sh\necho foo\n").expect("binary");

    let mut artifact = Artifact {
        name: "foo".into(),
        path,
        kind: ArtifactKind::Binary,
        os: os.into(),
        arch: arch.into(),
        arm: arm.into(),
        amd64: if arch == "amd64" { "v1".into() } else { String::new() },
        ..Default::default()
    };
    artifact.extra.id = "foo".into();
    artifact
}

/// Definition with defaults applied for project `foo`.
pub fn definition(formats: &[&str]) -> PackageDefinition {
    let mut definition = PackageDefinition {
        id: "foo".into(),
        formats: formats.iter().map(|f| f.to_string()).collect(),
        ..Default::default()
    };
    definition.overridables.maintainer = "Foo Maintainers <foo@example.com>".into();
    definition.overridables.description = "Foo does things".into();
    definition.apply_defaults("foo");
    definition
}

/// Bundler writing into `dist`, with the given registry and binaries.
pub fn bundler(
    dist: &Path,
    registry: PackagerRegistry,
    binaries: Vec<Artifact>,
    configure: impl FnOnce(SettingsBuilder) -> SettingsBuilder,
) -> (Bundler, Arc<ArtifactStore>) {
    let builder = SettingsBuilder::new()
        .project_name("foo")
        .version("1.0.0")
        .dist(dist)
        .env(HashMap::new());
    let settings = configure(builder).build().expect("settings");
    let store = Arc::new(ArtifactStore::new(binaries));
    (Bundler::new(settings, registry, store.clone()), store)
}

/// Reads the `control` file out of a built `.deb`.
pub fn deb_control(path: &Path) -> String {
    let bytes = std::fs::read(path).expect("deb file");
    let mut archive = ar::Archive::new(bytes.as_slice());
    while let Some(entry) = archive.next_entry() {
        let mut entry = entry.expect("ar entry");
        if entry.header().identifier() != b"control.tar.gz" {
            continue;
        }
        let mut gz = Vec::new();
        entry.read_to_end(&mut gz).expect("control.tar.gz");
        let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(gz.as_slice()));
        for file in tar.entries().expect("control entries") {
            let mut file = file.expect("control entry");
            if file.path().expect("path").to_string_lossy() == "control" {
                let mut control = String::new();
                file.read_to_string(&mut control).expect("control");
                return control;
            }
        }
    }
    panic!("no control file in {}", path.display());
}
