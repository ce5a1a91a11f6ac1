//! Configuration file support for extbuild.
//!
//! extbuild supports two configuration file locations:
//! - Global: `~/.extbuild/config.toml` - User-wide defaults
//! - Project: `.extbuild/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Every setting is
//! optional; accessors fall back to the pytracik layout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::descriptor::PlatformLayout;
use crate::core::host::LibraryNamePolicy;
use crate::core::language::CppStandard;

/// Name of the extension module when none is configured.
pub const DEFAULT_MODULE_NAME: &str = "pytracik";

/// Directory scanned for sources, relative to the project root.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Source file suffix.
pub const DEFAULT_EXTENSION: &str = ".cpp";

/// Version declaration file, relative to the project root.
pub const DEFAULT_VERSION_FILE: &str = "trac_ik/version.py";

/// Optional dependency list, relative to the project root.
pub const DEFAULT_REQUIREMENTS_FILE: &str = "requirements.txt";

/// extbuild configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Host interpreter settings
    pub python: PythonConfig,

    /// Linux system layout overrides
    pub linux: LinuxConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Extension module name
    pub module_name: Option<String>,

    /// Source directory (relative to the project root)
    pub source_dir: Option<PathBuf>,

    /// Source file suffix, e.g. ".cpp"
    pub extension: Option<String>,

    /// Version declaration file
    pub version_file: Option<PathBuf>,

    /// Newline-separated requirements file
    pub requirements_file: Option<PathBuf>,

    /// C++ standard version, e.g. "17"
    #[serde(alias = "cpp_std")]
    pub cxx_standard: Option<String>,
}

/// Host interpreter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    /// Explicit interpreter path
    pub interpreter: Option<PathBuf>,

    /// Naming scheme for the runtime library when the host reports none
    /// ("dotted" or "compact")
    pub fallback_naming: Option<String>,
}

/// Linux system locations. Each list replaces the default when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinuxConfig {
    pub include_dirs: Option<Vec<PathBuf>>,
    pub libraries: Option<Vec<String>>,
    pub library_dirs: Option<Vec<PathBuf>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Build settings
        if other.build.module_name.is_some() {
            self.build.module_name = other.build.module_name;
        }
        if other.build.source_dir.is_some() {
            self.build.source_dir = other.build.source_dir;
        }
        if other.build.extension.is_some() {
            self.build.extension = other.build.extension;
        }
        if other.build.version_file.is_some() {
            self.build.version_file = other.build.version_file;
        }
        if other.build.requirements_file.is_some() {
            self.build.requirements_file = other.build.requirements_file;
        }
        if other.build.cxx_standard.is_some() {
            self.build.cxx_standard = other.build.cxx_standard;
        }

        // Python settings
        if other.python.interpreter.is_some() {
            self.python.interpreter = other.python.interpreter;
        }
        if other.python.fallback_naming.is_some() {
            self.python.fallback_naming = other.python.fallback_naming;
        }

        // Linux layout (lists replace, not extend)
        if other.linux.include_dirs.is_some() {
            self.linux.include_dirs = other.linux.include_dirs;
        }
        if other.linux.libraries.is_some() {
            self.linux.libraries = other.linux.libraries;
        }
        if other.linux.library_dirs.is_some() {
            self.linux.library_dirs = other.linux.library_dirs;
        }
    }

    pub fn module_name(&self) -> &str {
        self.build
            .module_name
            .as_deref()
            .unwrap_or(DEFAULT_MODULE_NAME)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.build
            .source_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR))
    }

    pub fn extension(&self) -> &str {
        self.build.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }

    pub fn version_file(&self) -> PathBuf {
        self.build
            .version_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VERSION_FILE))
    }

    pub fn requirements_file(&self) -> PathBuf {
        self.build
            .requirements_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REQUIREMENTS_FILE))
    }

    /// Parse the C++ standard from config, defaulting to C++17.
    pub fn cpp_std(&self) -> CppStandard {
        match self.build.cxx_standard.as_deref().map(str::parse::<CppStandard>) {
            Some(Ok(std)) => std,
            Some(Err(e)) => {
                tracing::warn!("{}, using {}", e, CppStandard::default());
                CppStandard::default()
            }
            None => CppStandard::default(),
        }
    }

    /// Parse the fallback library naming policy from config.
    pub fn fallback_naming(&self) -> LibraryNamePolicy {
        match self
            .python
            .fallback_naming
            .as_deref()
            .map(str::parse::<LibraryNamePolicy>)
        {
            Some(Ok(policy)) => policy,
            Some(Err(e)) => {
                tracing::warn!("{}, using the default naming", e);
                LibraryNamePolicy::default()
            }
            None => LibraryNamePolicy::default(),
        }
    }

    /// Build the platform layout, applying any Linux overrides.
    pub fn layout(&self) -> PlatformLayout {
        let mut layout = PlatformLayout {
            cpp_std: self.cpp_std(),
            fallback_naming: self.fallback_naming(),
            ..PlatformLayout::default()
        };
        if let Some(ref dirs) = self.linux.include_dirs {
            layout.linux_include_dirs = dirs.clone();
        }
        if let Some(ref libs) = self.linux.libraries {
            layout.linux_libraries = libs.clone();
        }
        if let Some(ref dirs) = self.linux.library_dirs {
            layout.linux_library_dirs = dirs.clone();
        }
        layout
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.extbuild/config.toml)
/// 2. Global config (~/.extbuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global extbuild config directory (~/.extbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".extbuild"))
}

/// Get the global config path (~/.extbuild/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.extbuild/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".extbuild").join("config.toml")
}

/// Load the merged config for a project root.
pub fn load_project_config(project_root: &Path) -> Config {
    let global = global_config_path();
    load_config(global.as_deref(), &project_config_path(project_root))
}
