//! Command line interface for the Linux package builder.
//!
//! Loads the pipeline configuration and artifact manifest, runs the
//! [`Bundler`](crate::bundler::Bundler), and writes the updated manifest.

mod args;

pub use args::Args;

use crate::bundler::{ArtifactStore, Bundler, PackagerRegistry, SettingsBuilder, TaskOutcome};
use crate::error::{BundlerError, CliError, Result};
use crate::metadata;
use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(args).await
}

/// Runs the package stage for parsed arguments.
pub async fn execute(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let mut config = metadata::load_config(&args.config)?;
    config.apply_defaults()?;

    let version = args.version.clone().ok_or_else(|| CliError::MissingArgument {
        argument: "--version".to_string(),
    })?;

    let mut builder = SettingsBuilder::new()
        .project_name(config.project_name.clone())
        .version(version)
        .skip_sign(args.skip_sign)
        .keep_going(args.keep_going)
        .env(std::env::vars().collect::<HashMap<_, _>>());
    if let Some(dist) = &config.dist {
        builder = builder.dist(PathBuf::from(dist));
    }
    if let Some(parallelism) = args.parallelism {
        builder = builder.parallelism(parallelism);
    }
    let settings = builder.build()?;

    let artifacts = metadata::load_artifacts(&args.artifacts)?;
    log::info!(
        "loaded {} artifact(s) from {}",
        artifacts.len(),
        args.artifacts.display()
    );

    let store = Arc::new(ArtifactStore::new(artifacts));
    let bundler = Bundler::new(settings, PackagerRegistry::linux(), store.clone());
    let result = bundler.bundle(&config.nfpms).await;

    // Packages finished before a failure are still recorded.
    metadata::save_artifacts(&args.artifacts, &store.list())?;

    let outcomes = result.map_err(BundlerError::from)?;
    for outcome in &outcomes {
        match outcome {
            TaskOutcome::Packaged(artifact) => println!("created {}", artifact.path.display()),
            TaskOutcome::Skipped {
                format,
                platform,
                reason,
            } => log::info!("skipped {format} for {platform}: {reason}"),
        }
    }

    Ok(0)
}
