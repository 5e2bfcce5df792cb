//! Per-task package assembly.
//!
//! A [`PackageTask`] covers one (format, platform group) pair. It resolves the
//! platform target, merges the format override, expands templates, builds the
//! [`PackageInfo`] descriptor and hands it to the format's packager on a
//! blocking thread. The written file is then hashed and recorded.

use super::{
    checksum::calculate_sha256,
    recorder::{BuiltPackage, record},
    signing::passphrase_from_env,
};
use crate::bundler::{
    artifact::{Artifact, ArtifactStore, PlatformGroup},
    error::{Error, ErrorExt, Result},
    platform::{
        ApkInfo, ApkSignature, ArchLinuxInfo, DebInfo, DebSignature, PackageInfo,
        PackageSignature, Packager, PackagerRegistry, RpmInfo, RpmSignature,
    },
    settings::{
        ContentEntry, DEFAULT_FILE_NAME_TEMPLATE, FileInfo, Overridables, PackageDefinition,
        PackageTarget, Settings, TERMUX_FORMAT, TargetCheck, destinations,
    },
    template::{TemplateContext, TemplateEngine, TemplateFields},
    utils::fs,
};
use std::{io::Write, path::PathBuf, sync::Arc};

/// Terminal state of one packaging task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// A package was written and recorded.
    Packaged(Artifact),
    /// The format does not apply to the platform group.
    Skipped {
        /// Requested format.
        format: String,
        /// Platform group that was skipped.
        platform: String,
        /// Why the combination was skipped.
        reason: String,
    },
}

impl TaskOutcome {
    /// Recorded artifact, if a package was produced.
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            Self::Packaged(artifact) => Some(artifact),
            Self::Skipped { .. } => None,
        }
    }
}

/// Shared handles every task of a run needs.
#[derive(Clone, Debug)]
pub struct TaskContext {
    /// Run-wide settings.
    pub settings: Arc<Settings>,
    /// Format → packager lookup.
    pub registry: Arc<PackagerRegistry>,
    /// Artifact store receiving packages.
    pub store: Arc<ArtifactStore>,
    /// Template renderer.
    pub templates: Arc<TemplateEngine>,
}

/// One (format, platform group) packaging unit.
#[derive(Clone, Debug)]
pub struct PackageTask {
    /// Shared run handles.
    pub context: TaskContext,
    /// Definition the task belongs to.
    pub definition: Arc<PackageDefinition>,
    /// Output format.
    pub format: String,
    /// Binaries sharing one platform.
    pub group: PlatformGroup,
}

/// Descriptor plus the data needed to name the output file.
#[derive(Clone, Debug)]
pub struct Assembly {
    /// Fully expanded descriptor.
    pub info: PackageInfo,
    /// Template context of the task.
    pub template: TemplateContext,
    /// Output name template from the effective configuration.
    pub file_name_template: String,
    /// Unique arch key, used for per-task paths.
    pub unique_arch: String,
}

impl PackageTask {
    /// Runs the task to a terminal state.
    pub async fn run(self) -> Result<TaskOutcome> {
        let target = match PackageTarget::resolve(self.group.reference(), &self.format) {
            TargetCheck::Supported(target) => target,
            TargetCheck::Unsupported(reason) => {
                log::debug!("skipping {} for {}: {}", self.format, self.group.key, reason);
                return Ok(TaskOutcome::Skipped {
                    format: self.format,
                    platform: self.group.key.to_string(),
                    reason,
                });
            }
        };

        let packager = self.context.registry.get(&self.format)?;
        let assembly = self.assemble(&target).await?;
        let file_name = self.file_name(packager.as_ref(), &assembly)?;
        let path = self.context.settings.dist().join(&file_name);

        log::info!(
            "creating {} (package={}, format={}, arch={})",
            path.display(),
            assembly.info.name,
            self.format,
            assembly.unique_arch
        );

        let contents = assembly.info.contents.clone();
        write_package(packager, assembly.info, path.clone(), file_name.clone()).await?;
        let checksum = calculate_sha256(&path).await?;

        let artifact = record(
            &self.context.store,
            &self.group,
            BuiltPackage {
                name: file_name,
                path,
                id: self.definition.id.clone(),
                format: self.format,
                contents,
                checksum,
            },
        );
        Ok(TaskOutcome::Packaged(artifact))
    }

    /// Builds the package descriptor for `target`.
    pub async fn assemble(&self, target: &PackageTarget) -> Result<Assembly> {
        let settings = &self.context.settings;
        let definition = &self.definition;
        let reference = self.group.reference();
        let config = definition.effective_config(&self.format);

        let template = TemplateContext::new(
            settings,
            reference,
            TemplateFields {
                package_name: config.package_name.clone(),
                release: config.release.clone(),
                epoch: config.epoch.clone(),
                conventional_file_name: None,
            },
        );
        let expand = |text: &str| self.context.templates.apply(text, &template);

        let bindir = expand(&target.install_root(&definition.bindir))?;
        let homepage = expand(&config.homepage)?;
        let description = expand(&config.description)?;
        let maintainer = expand(&config.maintainer)?;
        let deb_key_file = expand(&config.deb.signature.key_file)?;
        let rpm_key_file = expand(&config.rpm.signature.key_file)?;
        let apk_key_file = expand(&config.apk.signature.key_file)?;
        let apk_key_name = expand(&config.apk.signature.key_name)?;

        let mut contents = Vec::with_capacity(config.contents.len() + self.group.binaries.len());
        for entry in &config.contents {
            contents.push(ContentEntry {
                source: expand(&entry.source)?,
                destination: expand(&entry.destination)?,
                ..entry.clone()
            });
        }

        if let Some(lintian) = self.write_lintian(&config, target).await? {
            contents.push(lintian);
        }

        if !definition.meta {
            for binary in &self.group.binaries {
                let source = binary.path.to_string_lossy().replace('\\', "/");
                let destination = format!("{}/{}", bindir.trim_end_matches('/'), binary.name);
                log::debug!(
                    "adding binary {} to package at {} (package={}, format={}, arch={})",
                    source,
                    destination,
                    config.package_name,
                    self.format,
                    target.unique_arch
                );
                contents.push(ContentEntry {
                    source,
                    destination,
                    file_info: FileInfo::with_mode(0o755),
                    ..Default::default()
                });
            }
        }

        log::debug!("all archive files: {:?}", destinations(&contents));

        let id = &definition.id;
        let mut info = PackageInfo {
            name: config.package_name.clone(),
            arch: target.info_arch.clone(),
            platform: target.platform.clone(),
            version: settings.version().to_string(),
            epoch: config.epoch.clone(),
            release: config.release.clone(),
            prerelease: config.prerelease.clone(),
            version_metadata: config.version_metadata.clone(),
            section: definition.section.clone(),
            priority: definition.priority.clone(),
            maintainer,
            description,
            vendor: definition.vendor.clone(),
            homepage,
            license: definition.license.clone(),
            changelog: definition.changelog.clone(),
            depends: config.dependencies.clone(),
            recommends: config.recommends.clone(),
            suggests: config.suggests.clone(),
            conflicts: config.conflicts.clone(),
            replaces: config.replaces.clone(),
            provides: config.provides.clone(),
            contents,
            scripts: config.scripts.clone(),
            deb: DebInfo {
                scripts: config.deb.scripts.clone(),
                triggers: config.deb.triggers.clone(),
                breaks: config.deb.breaks.clone(),
                compression: config.deb.compression.clone(),
                fields: config.deb.fields.clone().into_iter().collect(),
                signature: DebSignature {
                    signature: PackageSignature {
                        key_file: deb_key_file,
                        key_passphrase: passphrase_from_env(settings.env(), "DEB", id),
                    },
                    kind: config.deb.signature.kind.clone(),
                },
            },
            rpm: RpmInfo {
                summary: config.rpm.summary.clone(),
                group: config.rpm.group.clone(),
                compression: config.rpm.compression.clone(),
                scripts: config.rpm.scripts.clone(),
                signature: RpmSignature {
                    signature: PackageSignature {
                        key_file: rpm_key_file,
                        key_passphrase: passphrase_from_env(settings.env(), "RPM", id),
                    },
                },
            },
            apk: ApkInfo {
                scripts: config.apk.scripts.clone(),
                signature: ApkSignature {
                    signature: PackageSignature {
                        key_file: apk_key_file,
                        key_passphrase: passphrase_from_env(settings.env(), "APK", id),
                    },
                    key_name: apk_key_name,
                },
            },
            archlinux: ArchLinuxInfo {
                pkgbase: config.archlinux.pkgbase.clone(),
                packager: config.archlinux.packager.clone(),
                scripts: config.archlinux.scripts.clone(),
            },
            mtime: settings.date(),
        };

        if settings.skip_sign() {
            info.clear_signatures();
        }

        let file_name_template = if config.file_name_template.is_empty() {
            DEFAULT_FILE_NAME_TEMPLATE.to_string()
        } else {
            config.file_name_template.clone()
        };

        Ok(Assembly {
            info: info.with_defaults(),
            template,
            file_name_template,
            unique_arch: target.unique_arch.clone(),
        })
    }

    /// Writes the deb lintian overrides file and returns its content entry.
    ///
    /// Only deb-based formats get one. The file lives under
    /// `<dist>/<format>/<package>_<platform>_<arch>/`, one directory per task.
    async fn write_lintian(
        &self,
        config: &Overridables,
        target: &PackageTarget,
    ) -> Result<Option<ContentEntry>> {
        let overrides = &config.deb.lintian_overrides;
        if overrides.is_empty() || !is_deb_format(&self.format) {
            return Ok(None);
        }

        let package = &config.package_name;
        let lines: Vec<String> = overrides
            .iter()
            .map(|line| format!("{package}: {line}"))
            .collect();

        let path = self
            .context
            .settings
            .dist()
            .join(&self.format)
            .join(format!("{package}_{}_{}", target.platform, target.unique_arch))
            .join(".lintian");
        log::debug!("creating {}", path.display());
        fs::write_file(&path, lines.join("\n")).await?;

        Ok(Some(ContentEntry {
            source: path.to_string_lossy().into_owned(),
            destination: format!("./usr/share/lintian/overrides/{package}"),
            packager: "deb".to_string(),
            file_info: FileInfo::with_mode(0o644),
            ..Default::default()
        }))
    }

    /// Renders the output file name and appends the format extension.
    fn file_name(&self, packager: &dyn Packager, assembly: &Assembly) -> Result<String> {
        let template = assembly
            .template
            .with_conventional_file_name(packager.conventional_file_name(&assembly.info));
        let name = self
            .context
            .templates
            .apply(&assembly.file_name_template, &template)?;
        Ok(with_extension(name, &self.format, packager.conventional_extension()))
    }
}

/// Appends the format extension unless `name` already ends with it.
///
/// The packager's conventional extension is used when it has one, except for
/// `termux.deb`, which always ends in `.termux.deb`.
pub fn with_extension(mut name: String, format: &str, conventional: Option<&str>) -> String {
    let ext = match conventional {
        Some(ext) if format != TERMUX_FORMAT => ext.to_string(),
        _ => format!(".{format}"),
    };
    if !name.ends_with(&ext) {
        name.push_str(&ext);
    }
    name
}

fn is_deb_format(format: &str) -> bool {
    format == "deb" || format == TERMUX_FORMAT
}

async fn write_package(
    packager: Arc<dyn Packager>,
    info: PackageInfo,
    path: PathBuf,
    file_name: String,
) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        let file = std::fs::File::create(&path).fs_context("creating package file", &path)?;
        let mut writer = std::io::BufWriter::new(file);
        packager
            .package(&info, &mut writer)
            .map_err(|source| Error::Packaging {
                file: file_name,
                source: Box::new(source),
            })?;
        writer
            .flush()
            .fs_context("could not close package file", &path)?;
        Ok(())
    })
    .await?
}
