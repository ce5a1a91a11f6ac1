//! Command implementations

pub mod flags;
pub mod host;
pub mod plan;
pub mod sources;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::PythonArgs;
use extbuild::core::{Platform, PythonProbe};
use extbuild::util::config::{load_project_config, Config};

/// The project a command operates on.
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    /// Open the project at `dir`, or the current directory.
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        let dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().context("failed to get current directory")?,
        };
        let root = dir
            .canonicalize()
            .with_context(|| format!("project directory not found: {}", dir.display()))?;

        let config = load_project_config(&root);
        tracing::debug!("project root {}", root.display());

        Ok(Project { root, config })
    }

    /// Host probe honoring `--python`, then config, then PATH.
    pub fn probe(&self, args: &PythonArgs) -> PythonProbe {
        let interpreter = args
            .python
            .clone()
            .or_else(|| self.config.python.interpreter.clone());
        PythonProbe::new(interpreter)
    }
}

/// Parse a `--platform` value.
pub fn parse_platform(value: Option<&str>) -> Option<Platform> {
    value.map(Platform::from_os)
}
