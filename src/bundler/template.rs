//! Template expansion for user-supplied fields.
//!
//! Fields such as the bin directory, maintainer, content paths and the output
//! file name are handlebars templates rendered against a [`TemplateContext`]:
//!
//! ```text
//! {{PackageName}}_{{Version}}_{{Os}}_{{Arch}}{{#if Arm}}v{{Arm}}{{/if}}
//! ```
//!
//! Rendering is strict: referencing a field the context does not define is an
//! error rather than an empty string.

use crate::bundler::{
    artifact::Artifact,
    error::{Error, Result},
    settings::Settings,
};
use handlebars::Handlebars;
use serde::Serialize;
use std::collections::BTreeMap;

/// Named extra fields available next to the artifact fields.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateFields {
    /// Package name.
    pub package_name: String,
    /// Package release.
    pub release: String,
    /// Version epoch.
    pub epoch: String,
    /// Backend-computed conventional file name; only defined once the
    /// packager is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conventional_file_name: Option<String>,
}

/// Fixed-shape data a template is rendered against.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateContext {
    /// Project name.
    pub project_name: String,
    /// Version being released.
    pub version: String,
    /// Build date, RFC 3339.
    pub date: String,
    /// Environment variables.
    pub env: BTreeMap<String, String>,
    /// Reference binary name.
    pub binary: String,
    /// Reference binary OS.
    pub os: String,
    /// Reference binary architecture.
    pub arch: String,
    /// ARM revision.
    pub arm: String,
    /// MIPS variant.
    pub mips: String,
    /// AMD64 level.
    pub amd64: String,
    /// Extra named fields.
    #[serde(flatten)]
    pub fields: TemplateFields,
}

impl TemplateContext {
    /// Context for `artifact` within a run described by `settings`.
    pub fn new(settings: &Settings, artifact: &Artifact, fields: TemplateFields) -> Self {
        Self {
            project_name: settings.project_name().to_string(),
            version: settings.version().to_string(),
            date: settings.date().to_rfc3339(),
            env: settings
                .env()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            binary: artifact.name.clone(),
            os: artifact.os.clone(),
            arch: artifact.arch.clone(),
            arm: artifact.arm.clone(),
            mips: artifact.mips.clone(),
            amd64: artifact.amd64.clone(),
            fields,
        }
    }

    /// Copy of this context with the conventional file name defined.
    pub fn with_conventional_file_name(&self, name: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.fields.conventional_file_name = Some(name.into());
        ctx
    }
}

/// Strict handlebars renderer.
#[derive(Debug)]
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    /// Creates an engine in strict mode with HTML escaping disabled.
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    /// Renders `template` against `ctx`.
    ///
    /// Text without template expressions is returned unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::Template`] when the template is malformed or references an
    /// undefined field.
    pub fn apply(&self, template: &str, ctx: &TemplateContext) -> Result<String> {
        if !template.contains("{{") {
            return Ok(template.to_string());
        }
        self.registry
            .render_template(template, ctx)
            .map_err(|source| Error::Template {
                template: template.to_string(),
                source: Box::new(source),
            })
    }
}
