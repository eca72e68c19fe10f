// src/hash.rs

//! SHA-256 checksums for downloaded source archives
//!
//! Checksums are written `sha256:<hex>`, the same prefixed form used in the
//! configuration file.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Buffer size for streaming file hashing (64 KB)
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// A validated `sha256:<hex>` checksum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    hex: String,
}

impl Checksum {
    /// Parse a prefixed checksum string
    pub fn parse(s: &str) -> Result<Self> {
        let (algo, value) = s
            .split_once(':')
            .ok_or_else(|| Error::Config(format!("invalid checksum format: {s}")))?;

        if !algo.eq_ignore_ascii_case("sha256") {
            return Err(Error::Config(format!(
                "unsupported checksum algorithm: {algo} (supported: sha256)"
            )));
        }
        if value.len() != 64 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Config(format!(
                "sha256 checksum must be 64 hex characters: {value}"
            )));
        }

        Ok(Self {
            hex: value.to_ascii_lowercase(),
        })
    }

    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// Check a file against this checksum
    pub fn verify_file(&self, path: &Path) -> Result<()> {
        let actual = sha256_file(path)?;
        if actual != self.hex {
            return Err(Error::ChecksumMismatch {
                expected: self.to_string(),
                actual: format!("sha256:{actual}"),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.hex)
    }
}

/// Hash a reader with SHA-256, returning lowercase hex
pub fn sha256_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hash a file with SHA-256, returning lowercase hex
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(Error::io_at("failed to open", path))?;
    sha256_reader(file).map_err(Error::io_at("failed to read", path))
}
