// src/version/mod.rs

//! Release version handling for the wrapped toolkit
//!
//! VTK publishes its tarballs under a directory named after the `X.Y` series
//! and installs headers into `include/vtk-X.Y`, so most of the recipe only
//! cares about the first two components of the version.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A parsed release version with at least three dot-separated components
///
/// Examples:
/// - "9.1.0" → major=9, minor=1
/// - "9.3.0.rc1" → major=9, minor=3
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    major: u64,
    minor: u64,
    /// First two components as written
    series: String,
    raw: String,
}

impl ReleaseVersion {
    /// Parse a version string of the form `X.Y.Z[...]`
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidVersion {
            version: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() < 3 {
            return Err(invalid("expected at least three dot-separated components"));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty version component"));
        }

        let major = parts[0]
            .parse::<u64>()
            .map_err(|_| invalid("major component is not a number"))?;
        let minor = parts[1]
            .parse::<u64>()
            .map_err(|_| invalid("minor component is not a number"))?;

        Ok(Self {
            major,
            minor,
            series: format!("{}.{}", parts[0], parts[1]),
            raw: s.to_string(),
        })
    }

    /// Build a version from already-validated parts (internal use)
    pub(crate) fn new_unchecked(major: u64, minor: u64, raw: &str) -> Self {
        Self {
            major,
            minor,
            series: format!("{major}.{minor}"),
            raw: raw.to_string(),
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// The `X.Y` series exactly as written, with the patch component and
    /// anything after it dropped
    pub fn major_minor(&self) -> &str {
        &self.series
    }

    /// The full version exactly as given
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ReleaseVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ReleaseVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ReleaseVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
