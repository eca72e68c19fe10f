// src/settings.rs

//! Target platform descriptor
//!
//! Mirrors what a packaging tool passes to a recipe: operating system,
//! compiler, build type and architecture. Values default to the host and can
//! be overridden from the configuration file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
    Linux,
    Macos,
    Windows,
    FreeBsd,
    Other,
}

impl Os {
    /// Detect the host operating system
    pub fn host() -> Self {
        match std::env::consts::OS {
            "linux" => Self::Linux,
            "macos" => Self::Macos,
            "windows" => Self::Windows,
            "freebsd" => Self::FreeBsd,
            _ => Self::Other,
        }
    }

    pub fn is_linux(&self) -> bool {
        matches!(self, Self::Linux)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Macos => "Macos",
            Self::Windows => "Windows",
            Self::FreeBsd => "FreeBSD",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CMake build type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    /// Value for `CMAKE_BUILD_TYPE` and `--config`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }

    /// Parse a build type, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "release" => Some(Self::Release),
            "relwithdebinfo" => Some(Self::RelWithDebInfo),
            "minsizerel" => Some(Self::MinSizeRel),
            _ => None,
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full platform descriptor handed to each lifecycle step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    /// Compiler identifier; recorded in the build metadata only
    pub compiler: Option<String>,
    pub build_type: BuildType,
    pub arch: String,
}

impl Settings {
    /// Settings describing the machine we are running on
    pub fn host() -> Self {
        Self {
            os: Os::host(),
            compiler: None,
            build_type: BuildType::default(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_type_parse() {
        assert_eq!(BuildType::parse("release"), Some(BuildType::Release));
        assert_eq!(BuildType::parse("Debug"), Some(BuildType::Debug));
        assert_eq!(BuildType::parse("RELWITHDEBINFO"), Some(BuildType::RelWithDebInfo));
        assert_eq!(BuildType::parse("minsizerel"), Some(BuildType::MinSizeRel));
        assert_eq!(BuildType::parse("fast"), None);
    }

    #[test]
    fn test_host_settings() {
        let settings = Settings::host();
        assert_eq!(settings.build_type, BuildType::Release);
        assert!(!settings.arch.is_empty());
        assert!(settings.compiler.is_none());
        #[cfg(target_os = "linux")]
        assert!(settings.os.is_linux());
    }
}
