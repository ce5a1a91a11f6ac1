//! Core data types: platform identity, host facts, sources and versions.

pub mod discover;
pub mod host;
pub mod language;
pub mod platform;
pub mod requirements;
pub mod version;

pub use discover::{discover, DiscoveredSources};
pub use host::{HostProbe, HostPythonInfo, LibraryNamePolicy, PythonProbe};
pub use language::{CppStandard, Language};
pub use platform::Platform;
pub use version::{extract_version, VersionError};
