//! Build descriptor resolution.
//!
//! A [`BuildDescriptor`] is everything the extension-building toolchain
//! needs to compile and link one native module: sources, include paths,
//! libraries, library search paths and compiler flags. Descriptors exist
//! only for the platforms with a known system layout.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::core::discover::DiscoveredSources;
use crate::core::host::{HostPythonInfo, LibraryNamePolicy};
use crate::core::language::{CppStandard, Language};
use crate::core::platform::Platform;

/// Error resolving a build descriptor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

/// A platform for which a descriptor can be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedPlatform {
    Linux,
    Windows,
}

impl TryFrom<&Platform> for SupportedPlatform {
    type Error = DescriptorError;

    fn try_from(platform: &Platform) -> Result<Self, Self::Error> {
        match platform {
            Platform::Linux => Ok(SupportedPlatform::Linux),
            Platform::Windows => Ok(SupportedPlatform::Windows),
            Platform::Unsupported(name) => Err(DescriptorError::UnsupportedPlatform(name.clone())),
        }
    }
}

/// System locations and policies the resolver draws on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLayout {
    pub cpp_std: CppStandard,
    /// How to name the Python library when the host reports no filename
    pub fallback_naming: LibraryNamePolicy,
    /// Eigen, KDL, system and Boost headers
    pub linux_include_dirs: Vec<PathBuf>,
    /// NLopt, KDL and Boost support libraries
    pub linux_libraries: Vec<String>,
    pub linux_library_dirs: Vec<PathBuf>,
}

impl Default for PlatformLayout {
    fn default() -> Self {
        PlatformLayout {
            cpp_std: CppStandard::Cpp17,
            fallback_naming: LibraryNamePolicy::Dotted,
            linux_include_dirs: [
                "/usr/include/eigen3",
                "/usr/include/orocos/kdl",
                "/usr/include/",
                "/usr/include/boost",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
            linux_libraries: [
                "nlopt",
                "orocos-kdl",
                "boost_date_time",
                "boost_system",
                "boost_thread",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            linux_library_dirs: vec![PathBuf::from("/usr/lib/x86_64-linux-gnu")],
        }
    }
}

/// Complete inputs for building one native extension module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDescriptor {
    pub name: String,
    pub platform: SupportedPlatform,
    pub sources: Vec<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    pub libraries: Vec<String>,
    pub library_dirs: Vec<PathBuf>,
    pub language: Language,
    pub extra_compile_args: Vec<String>,
}

/// Resolve the build descriptor for `platform`.
///
/// Fails with [`DescriptorError::UnsupportedPlatform`] for any platform
/// other than Linux and Windows.
pub fn resolve(
    platform: &Platform,
    name: &str,
    sources: &DiscoveredSources,
    host: &HostPythonInfo,
    layout: &PlatformLayout,
) -> Result<BuildDescriptor, DescriptorError> {
    let platform = SupportedPlatform::try_from(platform)?;

    let mut descriptor = BuildDescriptor {
        name: name.to_string(),
        platform,
        sources: Vec::new(),
        include_dirs: Vec::new(),
        libraries: Vec::new(),
        library_dirs: Vec::new(),
        language: Language::Cxx,
        extra_compile_args: Vec::new(),
    };

    for source in sources.iter() {
        push_unique(&mut descriptor.sources, source.to_path_buf());
    }
    push_unique(
        &mut descriptor.include_dirs,
        host.binding_include_dir.clone(),
    );
    push_unique(&mut descriptor.include_dirs, host.include_dir.clone());

    match platform {
        SupportedPlatform::Linux => {
            for dir in &layout.linux_include_dirs {
                push_unique(&mut descriptor.include_dirs, dir.clone());
            }
            for lib in &layout.linux_libraries {
                push_unique(&mut descriptor.libraries, lib.clone());
            }
            push_unique(
                &mut descriptor.libraries,
                host.library_name(layout.fallback_naming),
            );
            for dir in &layout.linux_library_dirs {
                push_unique(&mut descriptor.library_dirs, dir.clone());
            }
            descriptor.extra_compile_args.push(layout.cpp_std.gnu_flag());
        }
        SupportedPlatform::Windows => {
            // Libraries and search paths come from the MSVC environment.
            descriptor.extra_compile_args.push(layout.cpp_std.msvc_flag());
        }
    }

    tracing::debug!(
        "resolved {} descriptor for `{}`: {} sources, {} include dirs, {} libraries",
        platform_name(platform),
        descriptor.name,
        descriptor.sources.len(),
        descriptor.include_dirs.len(),
        descriptor.libraries.len()
    );

    Ok(descriptor)
}

fn platform_name(platform: SupportedPlatform) -> &'static str {
    match platform {
        SupportedPlatform::Linux => "Linux",
        SupportedPlatform::Windows => "Windows",
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Compiler and linker command-line flags for a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub compile: Vec<String>,
    pub link: Vec<String>,
}

impl BuildDescriptor {
    /// Render the descriptor as flags in the platform compiler's syntax.
    pub fn flags(&self) -> FlagSet {
        let mut flags = FlagSet::default();

        match self.platform {
            SupportedPlatform::Linux => {
                flags
                    .compile
                    .extend(self.include_dirs.iter().map(|d| include_flag("-I", d)));
                flags.compile.extend(self.extra_compile_args.iter().cloned());
                flags
                    .link
                    .extend(self.library_dirs.iter().map(|d| include_flag("-L", d)));
                flags
                    .link
                    .extend(self.libraries.iter().map(|l| format!("-l{}", l)));
            }
            SupportedPlatform::Windows => {
                flags
                    .compile
                    .extend(self.include_dirs.iter().map(|d| include_flag("/I", d)));
                flags.compile.extend(self.extra_compile_args.iter().cloned());
                flags.link.extend(
                    self.library_dirs
                        .iter()
                        .map(|d| include_flag("/LIBPATH:", d)),
                );
                flags
                    .link
                    .extend(self.libraries.iter().map(|l| format!("{}.lib", l)));
            }
        }

        flags
    }
}

fn include_flag(prefix: &str, dir: &Path) -> String {
    format!("{}{}", prefix, dir.display())
}
