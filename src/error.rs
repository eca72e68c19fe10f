// src/error.rs

//! Error types for the VTK recipe
//!
//! Every variant is fatal for the recipe run. Nothing here is retried; the
//! caller sees the first failure together with whatever diagnostics the
//! external tool produced.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Filesystem operation that needs the path in the message
    #[error("{action} {}: {source}", path.display())]
    IoAt {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("download failed: {0}")]
    Download(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("failed to extract {}: {message}", archive.display())]
    Extract { archive: PathBuf, message: String },

    #[error("marker '{marker}' not found in {}", file.display())]
    PatchMarkerNotFound { marker: String, file: PathBuf },

    #[error("marker '{marker}' occurs {count} times in {}, expected exactly one", file.display())]
    PatchMarkerAmbiguous {
        marker: String,
        file: PathBuf,
        count: usize,
    },

    #[error("failed to install system package '{package}': {message}")]
    SystemPackage { package: String, message: String },

    #[error("cmake {phase} phase failed ({status})\n{log_tail}")]
    BuildPhase {
        phase: String,
        status: String,
        log_tail: String,
    },

    #[error("no library artifacts found under {}", dir.display())]
    ArtifactsMissing { dir: PathBuf },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Attach a path to an I/O error
    pub(crate) fn io_at(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::IoAt {
            action,
            path,
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
