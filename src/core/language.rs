//! Source language and C++ standard types.

use serde::{Deserialize, Serialize};

/// Source language of an extension module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    /// C++ language
    #[default]
    #[serde(rename = "c++", alias = "cpp", alias = "cxx")]
    Cxx,
}

impl Language {
    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Cxx => "c++",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// C++ standard version.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum CppStandard {
    /// C++11
    #[serde(rename = "11", alias = "c++11", alias = "cpp11")]
    Cpp11,
    /// C++14
    #[serde(rename = "14", alias = "c++14", alias = "cpp14")]
    Cpp14,
    /// C++17
    #[default]
    #[serde(rename = "17", alias = "c++17", alias = "cpp17")]
    Cpp17,
    /// C++20
    #[serde(rename = "20", alias = "c++20", alias = "cpp20")]
    Cpp20,
    /// C++23
    #[serde(rename = "23", alias = "c++23", alias = "cpp23")]
    Cpp23,
}

impl CppStandard {
    /// Get the standard as a compiler flag value (e.g., "c++17").
    pub fn as_flag_value(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 => "c++11",
            CppStandard::Cpp14 => "c++14",
            CppStandard::Cpp17 => "c++17",
            CppStandard::Cpp20 => "c++20",
            CppStandard::Cpp23 => "c++23",
        }
    }

    /// Get the MSVC-style standard flag value (e.g., "c++17", "c++latest" for C++23).
    pub fn as_msvc_flag_value(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 => "c++14", // MSVC has no c++11 switch
            CppStandard::Cpp14 => "c++14",
            CppStandard::Cpp17 => "c++17",
            CppStandard::Cpp20 => "c++20",
            CppStandard::Cpp23 => "c++latest",
        }
    }

    /// GCC/Clang flag, e.g. `-std=c++17`.
    pub fn gnu_flag(&self) -> String {
        format!("-std={}", self.as_flag_value())
    }

    /// MSVC flag, e.g. `/std:c++17`.
    pub fn msvc_flag(&self) -> String {
        format!("/std:{}", self.as_msvc_flag_value())
    }
}

impl std::str::FromStr for CppStandard {
    type Err = CppStandardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "11" | "c++11" | "cpp11" => Ok(CppStandard::Cpp11),
            "14" | "c++14" | "cpp14" => Ok(CppStandard::Cpp14),
            "17" | "c++17" | "cpp17" => Ok(CppStandard::Cpp17),
            "20" | "c++20" | "cpp20" => Ok(CppStandard::Cpp20),
            "23" | "c++23" | "cpp23" => Ok(CppStandard::Cpp23),
            _ => Err(CppStandardParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid C++ standard string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid C++ standard '{0}', valid values: 11, 14, 17, 20, 23")]
pub struct CppStandardParseError(pub String);

impl std::fmt::Display for CppStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "C++{}",
            match self {
                CppStandard::Cpp11 => "11",
                CppStandard::Cpp14 => "14",
                CppStandard::Cpp17 => "17",
                CppStandard::Cpp20 => "20",
                CppStandard::Cpp23 => "23",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpp_standard_parse() {
        assert_eq!("17".parse::<CppStandard>().unwrap(), CppStandard::Cpp17);
        assert_eq!("c++20".parse::<CppStandard>().unwrap(), CppStandard::Cpp20);
        assert!("98".parse::<CppStandard>().is_err());
    }

    #[test]
    fn test_cpp_standard_flags() {
        assert_eq!(CppStandard::Cpp17.gnu_flag(), "-std=c++17");
        assert_eq!(CppStandard::Cpp17.msvc_flag(), "/std:c++17");
        assert_eq!(CppStandard::Cpp23.msvc_flag(), "/std:c++latest");
    }

    #[test]
    fn test_language_serde() {
        let lang: Language = serde_json::from_str("\"cpp\"").unwrap();
        assert_eq!(lang, Language::Cxx);
        assert_eq!(serde_json::to_string(&Language::Cxx).unwrap(), "\"c++\"");
    }
}
