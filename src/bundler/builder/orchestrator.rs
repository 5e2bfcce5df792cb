//! Main packaging orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that turns package
//! definitions into concurrent packaging tasks and records the results.

use super::{
    assembler::{PackageTask, TaskContext, TaskOutcome},
    coordinator::run_bounded,
};
use crate::bundler::{
    Result,
    artifact::{ArtifactKind, ArtifactStore, group_by_platform},
    error::Error,
    platform::PackagerRegistry,
    settings::{PackageDefinition, Settings},
    template::TemplateEngine,
    utils::fs,
};
use std::sync::Arc;

/// Main packaging orchestrator.
///
/// Selects the Linux binaries of each [`PackageDefinition`], groups them by
/// platform and runs one task per (format, platform group) with at most
/// [`Settings::parallelism`] tasks in flight.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_linux::bundler::{
///     ArtifactStore, Bundler, PackageDefinition, PackagerRegistry, SettingsBuilder,
/// };
/// use std::sync::Arc;
///
/// # async fn example(definitions: Vec<PackageDefinition>) -> kodegen_bundler_linux::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_name("myapp")
///     .version("1.0.0")
///     .build()?;
/// let store = Arc::new(ArtifactStore::default());
///
/// let bundler = Bundler::new(settings, PackagerRegistry::linux(), store.clone());
/// let outcomes = bundler.bundle(&definitions).await?;
/// println!("{} tasks, {} artifacts", outcomes.len(), store.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    context: TaskContext,
}

impl Bundler {
    /// Creates a new bundler recording packages into `store`.
    pub fn new(settings: Settings, registry: PackagerRegistry, store: Arc<ArtifactStore>) -> Self {
        Self {
            context: TaskContext {
                settings: Arc::new(settings),
                registry: Arc::new(registry),
                store,
                templates: Arc::new(TemplateEngine::new()),
            },
        }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.context.settings
    }

    /// Returns the artifact store packages are recorded into.
    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.context.store
    }

    /// Packages every definition, in order.
    ///
    /// Definitions without formats are skipped. The first failing definition
    /// stops the run, unless [`Settings::keep_going`] is set; then every
    /// definition is attempted and the first error is returned at the end.
    pub async fn bundle(&self, definitions: &[PackageDefinition]) -> Result<Vec<TaskOutcome>> {
        let mut outcomes = Vec::new();
        let mut first_error: Option<Error> = None;

        for definition in definitions {
            if definition.formats.is_empty() {
                log::info!("skipping package definition {:?}: no output formats configured", definition.id);
                continue;
            }

            match self.bundle_definition(definition).await {
                Ok(mut done) => outcomes.append(&mut done),
                Err(e) if self.settings().keep_going() => {
                    log::warn!("package definition {:?} failed: {}", definition.id, e);
                    first_error.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(outcomes),
        }
    }

    /// Packages a single definition.
    ///
    /// # Errors
    ///
    /// [`Error::NoMatchingBinaries`] when no Linux or iOS binary matches the
    /// build filter; otherwise the first task failure.
    pub async fn bundle_definition(&self, definition: &PackageDefinition) -> Result<Vec<TaskOutcome>> {
        let binaries = self.context.store.filter(|artifact| {
            artifact.kind == ArtifactKind::Binary
                && (artifact.os == "linux" || artifact.os == "ios")
                && (definition.builds.is_empty() || definition.builds.contains(&artifact.extra.id))
        });

        let groups = group_by_platform(binaries);
        if groups.is_empty() {
            return Err(Error::NoMatchingBinaries {
                builds: definition.builds.clone(),
            });
        }

        fs::create_dir_all(self.settings().dist()).await?;

        let definition = Arc::new(definition.clone());
        let mut tasks = Vec::with_capacity(definition.formats.len() * groups.len());
        for format in &definition.formats {
            for group in &groups {
                let task = PackageTask {
                    context: self.context.clone(),
                    definition: definition.clone(),
                    format: format.clone(),
                    group: group.clone(),
                };
                tasks.push(task.run());
            }
        }

        log::debug!(
            "packaging {:?}: {} task(s), parallelism {}",
            definition.id,
            tasks.len(),
            self.settings().parallelism()
        );
        run_bounded(self.settings().parallelism(), tasks).await
    }
}
