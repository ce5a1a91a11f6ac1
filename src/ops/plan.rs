//! Implementation of `extbuild plan`.
//!
//! Assembles everything the extension toolchain needs for one build: the
//! package version, install requirements and the platform build descriptor.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::builder::descriptor::{resolve, BuildDescriptor, SupportedPlatform};
use crate::core::discover::{discover, DiscoveredSources};
use crate::core::host::HostProbe;
use crate::core::platform::Platform;
use crate::core::requirements::read_requirements;
use crate::core::version::extract_version;
use crate::util::config::Config;
use crate::util::diagnostic::Diagnostic;
use crate::util::fs::resolve_against;

/// Options for planning an extension build.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Describe the build for this platform instead of the host
    pub platform: Option<Platform>,
}

/// The extension build handed to the downstream toolchain.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionPlan {
    pub name: String,
    pub version: String,
    pub requirements: Vec<String>,
    pub extension: BuildDescriptor,
    /// Recoverable anomalies found while planning
    #[serde(skip)]
    pub warnings: Vec<Diagnostic>,
}

/// Discover the project's sources as configured.
pub fn discover_project_sources(project_root: &Path, config: &Config) -> DiscoveredSources {
    let source_dir = resolve_against(project_root, &config.source_dir());
    discover(&source_dir, config.extension(), project_root)
}

/// Read the project version as configured.
pub fn project_version(project_root: &Path, config: &Config) -> Result<String> {
    let path = resolve_against(project_root, &config.version_file());
    Ok(extract_version(&path)?)
}

/// Plan the extension build for a project.
pub fn plan_extension(
    project_root: &Path,
    config: &Config,
    options: &PlanOptions,
    probe: &dyn HostProbe,
) -> Result<ExtensionPlan> {
    let version = project_version(project_root, config)?;
    tracing::debug!("package version {}", version);

    let requirements = read_requirements(&resolve_against(
        project_root,
        &config.requirements_file(),
    ))?;

    let platform = options.platform.clone().unwrap_or_else(Platform::host);
    // Fail before probing the host: there is nothing to describe.
    SupportedPlatform::try_from(&platform)?;

    let sources = discover_project_sources(project_root, config);
    if sources.is_empty() {
        tracing::warn!(
            "no `{}` sources found in {}",
            config.extension(),
            config.source_dir().display()
        );
    }

    let host = probe.probe()?;
    tracing::info!(
        "Planning `{}` {} for {} (Python {})",
        config.module_name(),
        version,
        platform,
        host.version()
    );

    let extension = resolve(
        &platform,
        config.module_name(),
        &sources,
        &host,
        &config.layout(),
    )?;

    Ok(ExtensionPlan {
        name: config.module_name().to_string(),
        version,
        requirements,
        extension,
        warnings: sources.warnings,
    })
}
