//! Platform identity.
//!
//! Only Linux and Windows have a known system layout for the extension.
//! Every other operating system is carried as [`Platform::Unsupported`] so
//! that descriptor resolution has to handle it explicitly.

use std::fmt;
use std::str::FromStr;

/// Operating system the descriptor is produced for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    /// Any other operating system, by name.
    Unsupported(String),
}

impl Platform {
    /// Detect the platform this process is running on.
    pub fn host() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            _ => Platform::Unsupported(os.to_string()),
        }
    }

    /// Display name, matching how Python's `platform.system()` spells it.
    pub fn name(&self) -> &str {
        match self {
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
            Platform::Unsupported(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unsupported(_))
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    /// Parse a platform name. Unknown names become `Unsupported`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_os(s.trim()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_os() {
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
        assert_eq!(Platform::from_os("Windows"), Platform::Windows);
        assert_eq!(
            Platform::from_os("macos"),
            Platform::Unsupported("macos".to_string())
        );
    }

    #[test]
    fn test_parse_keeps_unknown_name() {
        let platform: Platform = "FreeBSD".parse().unwrap();
        assert!(!platform.is_supported());
        assert_eq!(platform.to_string(), "FreeBSD");
    }

    #[test]
    fn test_host_is_consistent() {
        let host = Platform::host();
        match std::env::consts::OS {
            "linux" => assert_eq!(host, Platform::Linux),
            "windows" => assert_eq!(host, Platform::Windows),
            other => assert_eq!(host, Platform::Unsupported(other.to_string())),
        }
    }
}
