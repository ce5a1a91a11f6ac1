//! Host interpreter introspection.
//!
//! The extension links against the Python installation that runs the build.
//! [`PythonProbe`] asks that interpreter for its include directory, runtime
//! library filename, version and the pybind11 header directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::diagnostic::suggestions;
use crate::util::process::{find_python, ProcessBuilder};

/// Script run by the interpreter; prints one JSON object on stdout.
const PROBE_SCRIPT: &str = r#"
import json, sys, sysconfig
try:
    import pybind11
    binding = pybind11.get_include()
except ImportError:
    binding = None
print(json.dumps({
    "include": sysconfig.get_paths()["include"],
    "ldlibrary": sysconfig.get_config_var("LDLIBRARY"),
    "major": sys.version_info.major,
    "minor": sys.version_info.minor,
    "binding_include": binding,
}))
"#;

/// Facts about the Python installation the extension is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPythonInfo {
    /// Directory containing `Python.h`
    pub include_dir: PathBuf,
    /// Runtime library filename, e.g. `libpython3.11.so`
    pub library_file: Option<String>,
    pub major: u32,
    pub minor: u32,
    /// Directory containing the binding headers (pybind11)
    pub binding_include_dir: PathBuf,
}

impl HostPythonInfo {
    /// Short library name to link against.
    ///
    /// Derived from the runtime library filename when the host reports one,
    /// otherwise synthesized from the interpreter version.
    pub fn library_name(&self, policy: LibraryNamePolicy) -> String {
        self.library_file
            .as_deref()
            .and_then(strip_library_decoration)
            .unwrap_or_else(|| policy.synthesize(self.major, self.minor))
    }

    /// `major.minor` version string.
    pub fn version(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

/// Naming scheme used when the host reports no runtime library filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryNamePolicy {
    /// `python3.11`, the Unix spelling
    #[default]
    Dotted,
    /// `python311`, the Windows import-library spelling
    Compact,
}

impl LibraryNamePolicy {
    pub fn synthesize(&self, major: u32, minor: u32) -> String {
        match self {
            LibraryNamePolicy::Dotted => format!("python{}.{}", major, minor),
            LibraryNamePolicy::Compact => format!("python{}{}", major, minor),
        }
    }
}

impl FromStr for LibraryNamePolicy {
    type Err = LibraryNamePolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dotted" => Ok(LibraryNamePolicy::Dotted),
            "compact" => Ok(LibraryNamePolicy::Compact),
            _ => Err(LibraryNamePolicyParseError(s.to_string())),
        }
    }
}

impl fmt::Display for LibraryNamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryNamePolicy::Dotted => f.write_str("dotted"),
            LibraryNamePolicy::Compact => f.write_str("compact"),
        }
    }
}

/// Error returned when parsing an invalid naming policy.
#[derive(Debug, Clone, Error)]
#[error("invalid library naming policy '{0}', valid values: dotted, compact")]
pub struct LibraryNamePolicyParseError(pub String);

/// Strip directory, `lib` prefix and platform suffix from a library filename.
///
/// `libpython3.11.so.1.0` becomes `python3.11`, `python311.dll` becomes
/// `python311`. Returns `None` if nothing is left.
pub fn strip_library_decoration(file: &str) -> Option<String> {
    let base = Path::new(file).file_name()?.to_str()?;

    let mut name = base;
    if let Some(pos) = name.rfind(".so") {
        let rest = &name[pos + 3..];
        if rest.chars().all(|c| c == '.' || c.is_ascii_digit()) {
            name = &name[..pos];
        }
    }
    for suffix in [".dylib", ".dll", ".lib", ".a"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped;
            break;
        }
    }
    let name = name.strip_prefix("lib").unwrap_or(name);

    (!name.is_empty()).then(|| name.to_string())
}

/// Errors from host introspection.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no Python interpreter found\n{}", suggestions::NO_INTERPRETER)]
    NoInterpreter,

    #[error("pybind11 is not installed for {interpreter}\n{}", suggestions::INSTALL_BINDINGS)]
    MissingBindings { interpreter: String },

    #[error("unexpected output from {interpreter}: {source}")]
    InvalidOutput {
        interpreter: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of host interpreter facts.
pub trait HostProbe {
    fn probe(&self) -> Result<HostPythonInfo>;
}

/// A fixed set of facts, e.g. for describing a foreign host.
impl HostProbe for HostPythonInfo {
    fn probe(&self) -> Result<HostPythonInfo> {
        Ok(self.clone())
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    include: PathBuf,
    ldlibrary: Option<String>,
    major: u32,
    minor: u32,
    binding_include: Option<PathBuf>,
}

/// Probes a real interpreter by running it.
#[derive(Debug, Clone, Default)]
pub struct PythonProbe {
    interpreter: Option<PathBuf>,
}

impl PythonProbe {
    /// Probe `interpreter`, or the first one found on PATH if `None`.
    pub fn new(interpreter: Option<PathBuf>) -> Self {
        PythonProbe { interpreter }
    }

    fn interpreter(&self) -> Result<PathBuf> {
        match self.interpreter {
            Some(ref path) => Ok(path.clone()),
            None => find_python().ok_or_else(|| ProbeError::NoInterpreter.into()),
        }
    }

    /// Decode the probe script's stdout.
    fn parse(interpreter: &Path, stdout: &str) -> Result<HostPythonInfo> {
        let name = interpreter.display().to_string();
        let output: ProbeOutput =
            serde_json::from_str(stdout.trim()).map_err(|source| ProbeError::InvalidOutput {
                interpreter: name.clone(),
                source,
            })?;

        let binding_include_dir = output
            .binding_include
            .ok_or(ProbeError::MissingBindings { interpreter: name })?;

        Ok(HostPythonInfo {
            include_dir: output.include,
            library_file: output.ldlibrary.filter(|s| !s.is_empty()),
            major: output.major,
            minor: output.minor,
            binding_include_dir,
        })
    }
}

impl HostProbe for PythonProbe {
    fn probe(&self) -> Result<HostPythonInfo> {
        let interpreter = self.interpreter()?;
        tracing::debug!("probing interpreter {}", interpreter.display());

        let output = ProcessBuilder::new(&interpreter)
            .args(["-c", PROBE_SCRIPT])
            .exec_and_check()
            .with_context(|| format!("failed to query {}", interpreter.display()))?;

        let info = Self::parse(&interpreter, &String::from_utf8_lossy(&output.stdout))?;
        tracing::debug!(
            "python {} include={} library={:?}",
            info.version(),
            info.include_dir.display(),
            info.library_file
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(library_file: Option<&str>, major: u32, minor: u32) -> HostPythonInfo {
        HostPythonInfo {
            include_dir: PathBuf::from("/usr/include/python3.11"),
            library_file: library_file.map(str::to_string),
            major,
            minor,
            binding_include_dir: PathBuf::from("/opt/pybind11/include"),
        }
    }

    #[test]
    fn test_fallback_name_from_version() {
        let info = host(None, 3, 11);
        assert_eq!(info.library_name(LibraryNamePolicy::Dotted), "python3.11");
        assert_eq!(info.library_name(LibraryNamePolicy::Compact), "python311");
    }

    #[test]
    fn test_name_from_library_file() {
        assert_eq!(
            host(Some("libpython3.11.so"), 3, 11).library_name(LibraryNamePolicy::Dotted),
            "python3.11"
        );
        assert_eq!(
            host(Some("python311.dll"), 3, 11).library_name(LibraryNamePolicy::Dotted),
            "python311"
        );
    }

    #[test]
    fn test_strip_library_decoration() {
        assert_eq!(
            strip_library_decoration("libpython3.12.so.1.0").as_deref(),
            Some("python3.12")
        );
        assert_eq!(
            strip_library_decoration("libpython3.9.a").as_deref(),
            Some("python3.9")
        );
        assert_eq!(
            strip_library_decoration("/usr/lib/libpython3.10.dylib").as_deref(),
            Some("python3.10")
        );
        assert_eq!(
            strip_library_decoration("libpython3.13t.so").as_deref(),
            Some("python3.13t")
        );
        assert_eq!(strip_library_decoration("lib.so"), None);
    }

    #[test]
    fn test_undecoratable_file_falls_back() {
        let info = host(Some("lib.a"), 3, 9);
        assert_eq!(info.library_name(LibraryNamePolicy::Dotted), "python3.9");
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "Compact".parse::<LibraryNamePolicy>().unwrap(),
            LibraryNamePolicy::Compact
        );
        assert!("other".parse::<LibraryNamePolicy>().is_err());
    }

    #[test]
    fn test_parse_probe_output() {
        let stdout = r#"{"include": "/usr/include/python3.11", "ldlibrary": "libpython3.11.so",
            "major": 3, "minor": 11, "binding_include": "/site/pybind11/include"}"#;
        let info = PythonProbe::parse(Path::new("python3"), stdout).unwrap();
        assert_eq!(info.include_dir, PathBuf::from("/usr/include/python3.11"));
        assert_eq!(info.library_file.as_deref(), Some("libpython3.11.so"));
        assert_eq!(info.version(), "3.11");
        assert_eq!(
            info.binding_include_dir,
            PathBuf::from("/site/pybind11/include")
        );
    }

    #[test]
    fn test_parse_probe_output_null_library() {
        let stdout = r#"{"include": "C:\\Python311\\Include", "ldlibrary": null,
            "major": 3, "minor": 11, "binding_include": "C:\\pybind11\\include"}"#;
        let info = PythonProbe::parse(Path::new("python"), stdout).unwrap();
        assert!(info.library_file.is_none());
        assert_eq!(info.library_name(LibraryNamePolicy::Dotted), "python3.11");
    }

    #[test]
    fn test_parse_probe_output_missing_bindings() {
        let stdout = r#"{"include": "/inc", "ldlibrary": "", "major": 3, "minor": 12,
            "binding_include": null}"#;
        let err = PythonProbe::parse(Path::new("python3"), stdout).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProbeError>(),
            Some(ProbeError::MissingBindings { .. })
        ));
    }

    #[test]
    fn test_parse_probe_garbage() {
        let err = PythonProbe::parse(Path::new("python3"), "Traceback...").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProbeError>(),
            Some(ProbeError::InvalidOutput { .. })
        ));
    }

    #[test]
    fn test_fixed_probe() {
        let info = host(None, 3, 10);
        assert_eq!(info.probe().unwrap(), info);
    }
}
