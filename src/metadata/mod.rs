//! Pipeline configuration and artifact manifest loading.
//!
//! The configuration is a TOML file listing package definitions:
//!
//! ```toml
//! project_name = "myapp"
//! dist = "dist"
//!
//! [[nfpms]]
//! formats = ["deb"]
//! maintainer = "Jane Doe <jane@example.com>"
//! ```
//!
//! The artifact manifest is the JSON list of artifacts produced by earlier
//! release stages. Packages built here are appended and the manifest is
//! written back.

use crate::bundler::{Artifact, PackageDefinition};
use crate::error::{BundlerError, CliError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};

/// Parsed pipeline configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Project name, the default package name.
    pub project_name: String,

    /// Output directory.
    pub dist: Option<String>,

    /// Package definitions.
    pub nfpms: Vec<PackageDefinition>,
}

impl PipelineConfig {
    /// Fills definition defaults and rejects duplicate IDs.
    pub fn apply_defaults(&mut self) -> Result<()> {
        if self.project_name.is_empty() {
            return Err(CliError::InvalidArguments {
                reason: "project_name is required in the configuration".to_string(),
            }
            .into());
        }

        for definition in &mut self.nfpms {
            definition.apply_defaults(&self.project_name);
        }

        let mut seen = HashSet::new();
        for definition in &self.nfpms {
            if !seen.insert(definition.id.as_str()) {
                return Err(CliError::InvalidArguments {
                    reason: format!(
                        "found 2 nfpms with the ID '{}', please fix your config",
                        definition.id
                    ),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Loads the pipeline configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: PipelineConfig = toml::from_str(&raw)?;
    Ok(config)
}

/// Loads artifacts from a JSON manifest. A missing file is an empty list.
pub fn load_artifacts(path: &Path) -> Result<Vec<Artifact>> {
    if !path.exists() {
        log::debug!("artifact manifest {} not found, starting empty", path.display());
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact manifest {}", path.display()))?;
    serde_json::from_str(&raw).map_err(BundlerError::from)
}

/// Writes artifacts to a JSON manifest, pretty-printed.
pub fn save_artifacts(path: &Path, artifacts: &[Artifact]) -> Result<()> {
    let json = serde_json::to_string_pretty(artifacts)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write artifact manifest {}", path.display()))?;
    Ok(())
}
